//! Sources of text handed to the tree builder.

use std::borrow::Cow;

/// Produces the source text in chunks.
///
/// `read_chunk` is called with the byte offset of the next chunk until it
/// returns `None` or an empty chunk.
pub trait TextInput {
    fn read_chunk(&mut self, offset: usize) -> Option<Cow<'_, str>>;

    /// Drains the input into a single string.
    fn read_to_string(&mut self) -> String {
        let mut text = String::new();
        while let Some(chunk) = self.read_chunk(text.len()) {
            if chunk.is_empty() {
                break;
            }
            text.push_str(&chunk);
        }
        text
    }
}

impl TextInput for &str {
    fn read_chunk(&mut self, offset: usize) -> Option<Cow<'_, str>> {
        self.get(offset..).filter(|rest| !rest.is_empty()).map(Cow::Borrowed)
    }
}

impl TextInput for String {
    fn read_chunk(&mut self, offset: usize) -> Option<Cow<'_, str>> {
        self.as_str().get(offset..).filter(|rest| !rest.is_empty()).map(Cow::Borrowed)
    }
}

/// Adapts a closure that lazily produces chunks of text.
pub struct ChunkReader<F>(pub F);

impl<F> TextInput for ChunkReader<F>
where
    F: FnMut(usize) -> Option<String>,
{
    fn read_chunk(&mut self, offset: usize) -> Option<Cow<'_, str>> {
        (self.0)(offset).map(Cow::Owned)
    }
}
