pub mod dashboard;
pub mod events;
pub mod members;
pub mod pix;
pub mod site;
pub mod tasks;
