/// Token-level word embedding lookup.
pub trait IWordEmbeddings: Send + Sync {
    /// The embedding for a token, or None for out-of-vocabulary tokens.
    fn vector(&self, token: &str) -> Option<&[f32]>;

    /// The dimensionality of every vector in the table.
    fn dimensions(&self) -> usize;
}
