// BR Code text fields only accept a restricted ASCII subset.

fn transliterate(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' | 'Ç' => 'C',
        'ñ' | 'Ñ' => 'N',
        other => other.to_ascii_uppercase(),
    }
}

fn is_permitted_punctuation(c: char) -> bool {
    matches!(c, '.' | ',' | '-' | '/' | '&' | '\'')
}

/// Normalises a merchant name or city: uppercase ASCII letters, digits, single
/// spaces and basic punctuation, cut to `max_len` characters.
pub fn merchant_text(input: &str, max_len: usize) -> String {
    let mut out = String::with_capacity(input.len().min(max_len));
    let mut pending_space = false;

    for c in input.chars() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }

        let c = transliterate(c);
        if !(c.is_ascii_uppercase() || c.is_ascii_digit() || is_permitted_punctuation(c)) {
            continue;
        }

        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }

    out.truncate(max_len);
    out.trim_end().to_string()
}

/// Reference labels are alphanumeric only.
pub fn reference_label(input: &str, max_len: usize) -> String {
    input
        .chars()
        .map(transliterate)
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .take(max_len)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merchant_text_strips_accents_and_uppercases() {
        assert_eq!(merchant_text("Igreja São João", 25), "IGREJA SAO JOAO");
        assert_eq!(merchant_text("Conceição do Araguaia", 25), "CONCEICAO DO ARAGUAIA");
    }

    #[test]
    fn test_merchant_text_collapses_whitespace() {
        assert_eq!(merchant_text("  Rio \t de   Janeiro ", 15), "RIO DE JANEIRO");
    }

    #[test]
    fn test_merchant_text_drops_unsupported_characters() {
        assert_eq!(merchant_text("Igreja <Viva>! ✝", 25), "IGREJA VIVA");
        assert_eq!(merchant_text("Min. Vida & Paz", 25), "MIN. VIDA & PAZ");
        assert_eq!(merchant_text("✝✝✝", 25), "");
    }

    #[test]
    fn test_merchant_text_truncates_without_trailing_space() {
        assert_eq!(merchant_text("SAO JOSE DOS CAMPOS", 15), "SAO JOSE DOS CA");
        assert_eq!(merchant_text("SAO JOSE DOS    X", 12), "SAO JOSE DOS");
        assert_eq!(merchant_text("ABCDEFGHIJ KLMNO", 11), "ABCDEFGHIJ");
    }

    #[test]
    fn test_reference_label_is_alphanumeric() {
        assert_eq!(reference_label("Doação - Missões 2026", 25), "DOACAOMISSOES2026");
        assert_eq!(reference_label("dízimo", 3), "DIZ");
        assert_eq!(reference_label("!!!", 25), "");
    }
}
