pub mod confidence;
pub mod model;
pub mod vocabulary;
pub mod word_bank;
