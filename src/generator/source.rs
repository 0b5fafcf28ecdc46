use xxhash_rust::xxh3::xxh3_128;

use crate::key::Key;

use super::ShaderStage;

/// Binding summary of an emitted block, for building the pipeline layout and
/// allocating the backing buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockBinding {
    pub name: Key,
    pub set: u32,
    pub binding: u32,
    /// Fixed byte size under the block's memory layout.
    pub byte_size: usize,
}

/// Generated source of one shader stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderSource {
    pub stage: ShaderStage,
    pub name: String,
    pub code: String,
    /// xxh3-128 of `code`; identical inputs always give the same hash.
    pub hash: u128,
    pub uniform_blocks: Vec<BlockBinding>,
    pub storage_blocks: Vec<BlockBinding>,
}

impl ShaderSource {
    pub(crate) fn new(
        stage: ShaderStage,
        name: String,
        code: String,
        uniform_blocks: Vec<BlockBinding>,
        storage_blocks: Vec<BlockBinding>,
    ) -> Self {
        let hash = xxh3_128(code.as_bytes());
        Self { stage, name, code, hash, uniform_blocks, storage_blocks }
    }

    /// Number of source lines, used in debug output.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.code.lines().count()
    }
}

impl AsRef<str> for ShaderSource {
    fn as_ref(&self) -> &str {
        &self.code
    }
}
