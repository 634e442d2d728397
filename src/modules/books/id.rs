use nanoid::nanoid;

/// Source of fresh book identifiers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random URL-safe nanoids of a fixed length.
#[derive(Debug, Clone)]
pub struct NanoIdGenerator {
    length: usize,
}

impl NanoIdGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl IdGenerator for NanoIdGenerator {
    fn generate(&self) -> String {
        let length = self.length;
        nanoid!(length)
    }
}
