pub mod autotext;
pub mod composer;
pub mod dict;
pub mod lang;
pub mod learning;
pub mod settings;
pub mod suggest;
pub mod unicode;
pub mod usage;
