//! # harvx-compress
//!
//! **Tier 1 (Pipeline Stage)**
//!
//! `Compress(source) -> CompressedOutput` dispatch, by file extension,
//! over implementations that reduce a file to an ordered list of
//! verbatim signatures: function/method heads up to and including the
//! return type, class/interface declarations without bodies, top-level
//! typed constants, import/export lines, and doc comments attached to
//! the following declaration. Extraction is verbatim over AST node
//! spans — nothing is summarized or rewritten.
//!
//! The registry and trait are the whole of this crate. Per-language
//! AST-backed extraction is a tree-sitter integration left to an
//! external collaborator; shipping it here would mean vendoring a
//! grammar per supported language, which is out of scope for the core
//! pipeline. `CompressorRegistry` ships with no language entries
//! registered, so `compress()` always falls through to
//! [`PassthroughCompressor`] today — `--compress` is wired end to end,
//! it just has nothing to dispatch to yet. Registering a real
//! compressor for a language is a one-line `register()` call away.

use std::collections::HashMap;

/// One verbatim span carried into the compressed projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureKind {
    FunctionHead,
    ClassHead,
    Constant,
    Import,
    DocComment,
    /// Emitted by [`PassthroughCompressor`]: the whole source, unsplit.
    Verbatim,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub kind: SignatureKind,
    pub text: String,
}

/// An ordered list of signatures extracted from one file, in source
/// order.
#[derive(Debug, Clone, Default)]
pub struct CompressedOutput {
    pub signatures: Vec<Signature>,
}

impl CompressedOutput {
    /// Joins signature text back into a single rendered projection,
    /// one signature per line group, in extraction order.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, sig) in self.signatures.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&sig.text);
        }
        out
    }
}

/// Implementations are stateless and must be safe to call concurrently
/// from multiple worker threads on disjoint input.
pub trait Compressor: Send + Sync {
    fn compress(&self, source: &str) -> CompressedOutput;
}

/// The registry's fallback: every extension without a registered
/// compressor gets this, which returns the source unchanged as a
/// single [`SignatureKind::Verbatim`] span.
pub struct PassthroughCompressor;

impl Compressor for PassthroughCompressor {
    fn compress(&self, source: &str) -> CompressedOutput {
        CompressedOutput {
            signatures: vec![Signature {
                kind: SignatureKind::Verbatim,
                text: source.to_string(),
            }],
        }
    }
}

/// Maps a file extension (without the leading dot, lowercase) to a
/// [`Compressor`]. Unregistered extensions fall through to
/// [`PassthroughCompressor`].
pub struct CompressorRegistry {
    by_extension: HashMap<String, Box<dyn Compressor>>,
    fallback: Box<dyn Compressor>,
}

impl Default for CompressorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_extension: HashMap::new(),
            fallback: Box::new(PassthroughCompressor),
        }
    }

    #[must_use]
    pub fn register(mut self, extension: &str, compressor: Box<dyn Compressor>) -> Self {
        self.by_extension.insert(extension.to_ascii_lowercase(), compressor);
        self
    }

    /// Compresses `source` for `extension`, returning the rendered
    /// projection and whether a dedicated (non-passthrough) compressor
    /// actually ran. `FileDescriptor.is_compressed` is set from the
    /// second element.
    #[must_use]
    pub fn compress(&self, extension: &str, source: &str) -> (String, bool) {
        let key = extension.trim_start_matches('.').to_ascii_lowercase();
        match self.by_extension.get(&key) {
            Some(compressor) => (compressor.compress(source).render(), true),
            None => (self.fallback.compress(source).render(), false),
        }
    }
}
