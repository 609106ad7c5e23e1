use super::{GeneratedDocument, GeneratorError};

/// A renderer that turns one owned request into a finished PDF.
///
/// Handlers move the request into a blocking worker, so it is taken by value.
pub trait Generator<Req> {
    fn generate(&self, request: Req) -> Result<GeneratedDocument, GeneratorError>;
}
