//! Transformer trait for record transformation

use eyre::Result;

/// Transformer trait for transforming extracted items
///
/// Implementors define a single conversion step, for example rewriting a
/// timestamp field or building a typed model from a raw record. Steps are
/// composed with [`Transformer::then`].
///
/// # Example
/// ```
/// use tableau_metadata_extractor::etl::Transformer;
/// use eyre::Result;
/// use serde_json::{Value, json};
///
/// struct Uppercase(&'static str);
///
/// impl Transformer for Uppercase {
///     type Input = Value;
///     type Output = Value;
///
///     fn transform(&self, mut input: Self::Input) -> Result<Self::Output> {
///         if let Some(Value::String(s)) = input.get_mut(self.0) {
///             *s = s.to_uppercase();
///         }
///         Ok(input)
///     }
/// }
///
/// let output = Uppercase("name").transform(json!({"name": "sales"})).unwrap();
/// assert_eq!(output["name"], "SALES");
/// ```
pub trait Transformer: Send + Sync {
    /// Input item type
    type Input: Send;

    /// Output item type after transformation
    type Output: Send;

    /// Transform a single item
    ///
    /// # Errors
    /// Returns an error if transformation fails (validation, conversion, etc.)
    fn transform(&self, input: Self::Input) -> Result<Self::Output>;

    /// Run `next` on the output of this transformer
    fn then<N>(self, next: N) -> Chain<Self, N>
    where
        Self: Sized,
        N: Transformer<Input = Self::Output>,
    {
        Chain { first: self, next }
    }
}

/// Two transformers applied in sequence
#[derive(Debug, Clone)]
pub struct Chain<A, B> {
    first: A,
    next: B,
}

impl<A, B> Transformer for Chain<A, B>
where
    A: Transformer,
    B: Transformer<Input = A::Output>,
{
    type Input = A::Input;
    type Output = B::Output;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        self.next.transform(self.first.transform(input)?)
    }
}
