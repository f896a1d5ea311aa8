mod convert;
mod source;

pub use source::DynamoDbSource;
