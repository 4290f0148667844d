//! Well-known metadata keys.
//!
//! Keys are dot-separated namespaces. Per-architecture keys are templates
//! containing [`ARCH_PLACEHOLDER`], resolved with [`resolve`] before they are
//! encoded. Spellings are matched byte-for-byte by readers and must not be
//! "corrected".

/// Placeholder substituted by the architecture identifier.
pub const ARCH_PLACEHOLDER: &str = "{arch}";

/// Substitute the architecture identifier into a key template.
///
/// Keys without a placeholder are returned unchanged.
pub fn resolve(template: &str, arch: &str) -> String {
    template.replace(ARCH_PLACEHOLDER, arch)
}

/// Returns `true` when `key` still contains an unresolved placeholder.
pub fn is_template(key: &str) -> bool {
    key.contains(ARCH_PLACEHOLDER)
}

pub mod general {
    pub const ARCHITECTURE: &str = "general.architecture";
    pub const QUANTIZATION_VERSION: &str = "general.quantization_version";
    pub const ALIGNMENT: &str = "general.alignment";
    pub const NAME: &str = "general.name";
    pub const AUTHOR: &str = "general.author";
    pub const URL: &str = "general.url";
    pub const DESCRIPTION: &str = "general.description";
    pub const FILE_TYPE: &str = "general.file_type";
    pub const LICENSE: &str = "general.license";
    pub const SOURCE_URL: &str = "general.source.url";
    pub const SOURCE_HF_REPO: &str = "general.source.hugginface.repository";
}

pub mod llm {
    pub const CONTEXT_LENGTH: &str = "{arch}.context_length";
    pub const EMBEDDING_LENGTH: &str = "{arch}.embedding_length";
    pub const BLOCK_COUNT: &str = "{arch}.block_count";
    pub const FEED_FORWARD_LENGTH: &str = "{arch}.feed_forward_length";
    pub const USE_PARALLEL_RESIDUAL: &str = "{arch}.use_parallel_residual";
    pub const TENSOR_DATA_LAYOUT: &str = "{arch}.tensor_data_layout";
}

pub mod attention {
    pub const HEAD_COUNT: &str = "{arch}.attention.head_count";
    pub const HEAD_COUNT_KV: &str = "{arch}.attention.head_count_kv";
    pub const MAX_ALIBI_BIAS: &str = "{arch}.attention.max_alibi_bias";
    pub const CLAMP_KQV: &str = "{arch}.attention.clamp_kqv";
    pub const LAYERNORM_EPS: &str = "{arch}.attention.layer_norm_epsilon";
    pub const LAYERNORM_RMS_EPS: &str = "{arch}.attention.layer_norm_rms_epsilon";
}

pub mod rope {
    pub const DIMENSION_COUNT: &str = "{arch}.rope.dimension_count";
    pub const SCALE: &str = "{arch}.rope.scale";
}

pub mod tokenizer {
    pub const MODEL: &str = "tokenizer.ggml.model";
    pub const LIST: &str = "tokenizer.ggml.tokens";
    pub const TOKEN_TYPE: &str = "tokenizer.ggml.token_type";
    pub const SCORES: &str = "tokenizer.ggml.scores";
    pub const MERGES: &str = "tokenizer.ggml.merges";
    pub const BOS_ID: &str = "tokenizer.ggml.bos_token_id";
    pub const EOS_ID: &str = "tokenizer.ggml.eos_token_id";
    pub const UNK_ID: &str = "tokenizer.ggml.unknown_token_id";
    pub const SEP_ID: &str = "tokenizer.ggml.seperator_token_id";
    pub const PAD_ID: &str = "tokenizer.ggml.padding_token_id";
    pub const HF_JSON: &str = "tokenizer.huggingface.json";
    pub const RWKV: &str = "tokenizer.rwkv.world";
}
