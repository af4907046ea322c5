use crate::error::SourceError;
use crate::record::{PostRecord, PostResult};

/// Anything that can yield post records in their original order, with decode
/// failures interleaved. Each row carries its 1-based line number.
/// A source may be scanned more than once.
pub trait PostSource: Sync {
    fn for_each_post(&self, on_post: &mut dyn FnMut(u64, PostResult)) -> Result<(), SourceError>;

    /// Materialize every `(line, row)` in order. Override when bulk loading can
    /// be done faster than repeated `for_each_post` callbacks.
    fn load_table(&self) -> Result<Vec<(u64, PostResult)>, SourceError> {
        let mut rows = Vec::new();
        self.for_each_post(&mut |n, p| rows.push((n, p)))?;
        Ok(rows)
    }
}

impl PostSource for [PostRecord] {
    fn for_each_post(&self, on_post: &mut dyn FnMut(u64, PostResult)) -> Result<(), SourceError> {
        for (i, p) in self.iter().enumerate() {
            on_post(i as u64 + 1, Ok(p.clone()));
        }
        Ok(())
    }
}

impl PostSource for Vec<PostRecord> {
    fn for_each_post(&self, on_post: &mut dyn FnMut(u64, PostResult)) -> Result<(), SourceError> {
        self.as_slice().for_each_post(on_post)
    }
}

impl<S: PostSource + ?Sized> PostSource for &S {
    fn for_each_post(&self, on_post: &mut dyn FnMut(u64, PostResult)) -> Result<(), SourceError> {
        (**self).for_each_post(on_post)
    }
    fn load_table(&self) -> Result<Vec<(u64, PostResult)>, SourceError> {
        (**self).load_table()
    }
}
