//! 文本输出

pub mod serializer;

pub use serializer::Serializer;
