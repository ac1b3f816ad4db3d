const POLYNOMIAL: u16 = 0x1021;
const INITIAL: u16 = 0xFFFF;

/// CRC-16/CCITT-FALSE: no input or output reflection, no final xor.
pub fn crc16_ccitt_false(data: &[u8]) -> u16 {
    data.iter().fold(INITIAL, |crc, &byte| {
        let mut crc = crc ^ ((byte as u16) << 8);
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
        }
        crc
    })
}
