// Adapters layer: concrete implementations of the domain ports (menu storage, completion service).

pub mod gemini;
pub mod storage;
