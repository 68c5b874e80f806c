pub mod analysis;
pub mod content;
pub mod injector;
pub mod llm;
pub mod payments;
pub mod pipeline;
pub mod publication;
pub mod storage;
pub mod structured;

#[cfg(test)]
pub(crate) mod testing;
