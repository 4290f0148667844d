//! Setters for the well-known metadata keys.
//!
//! Each method only names a key from [`gguf_format::keys`] (resolving the
//! `{arch}` template where needed) and forwards to a typed setter.

use crate::GgufWriter;
use crate::error::Result;
use gguf_format::keys::{self, attention, general, llm, rope, tokenizer};
use std::io::Write;

impl<W: Write> GgufWriter<W> {
    // --- general -----------------------------------------------------------

    pub fn add_architecture(&mut self, architecture: &str) -> Result<()> {
        self.add_string(general::ARCHITECTURE, architecture)
    }

    pub fn add_quantization_version(&mut self, version: u32) -> Result<()> {
        self.add_uint32(general::QUANTIZATION_VERSION, version)
    }

    pub fn add_name(&mut self, name: &str) -> Result<()> {
        self.add_string(general::NAME, name)
    }

    pub fn add_author(&mut self, author: &str) -> Result<()> {
        self.add_string(general::AUTHOR, author)
    }

    pub fn add_url(&mut self, url: &str) -> Result<()> {
        self.add_string(general::URL, url)
    }

    pub fn add_description(&mut self, description: &str) -> Result<()> {
        self.add_string(general::DESCRIPTION, description)
    }

    /// `general.file_type` as UINT32 (0 = all F32, 1 = mostly F16).
    pub fn add_file_type(&mut self, file_type: u32) -> Result<()> {
        self.add_uint32(general::FILE_TYPE, file_type)
    }

    pub fn add_license(&mut self, license: &str) -> Result<()> {
        self.add_string(general::LICENSE, license)
    }

    pub fn add_source_url(&mut self, url: &str) -> Result<()> {
        self.add_string(general::SOURCE_URL, url)
    }

    pub fn add_source_hf_repo(&mut self, repo: &str) -> Result<()> {
        self.add_string(general::SOURCE_HF_REPO, repo)
    }

    // --- per-architecture hyperparameters ----------------------------------

    pub fn add_context_length(&mut self, arch: &str, length: u32) -> Result<()> {
        self.add_uint32(&keys::resolve(llm::CONTEXT_LENGTH, arch), length)
    }

    pub fn add_embedding_length(&mut self, arch: &str, length: u32) -> Result<()> {
        self.add_uint32(&keys::resolve(llm::EMBEDDING_LENGTH, arch), length)
    }

    pub fn add_block_count(&mut self, arch: &str, count: u32) -> Result<()> {
        self.add_uint32(&keys::resolve(llm::BLOCK_COUNT, arch), count)
    }

    pub fn add_feed_forward_length(&mut self, arch: &str, length: u32) -> Result<()> {
        self.add_uint32(&keys::resolve(llm::FEED_FORWARD_LENGTH, arch), length)
    }

    pub fn add_parallel_residual(&mut self, arch: &str, enabled: bool) -> Result<()> {
        self.add_bool(&keys::resolve(llm::USE_PARALLEL_RESIDUAL, arch), enabled)
    }

    pub fn add_tensor_data_layout(&mut self, arch: &str, layout: &str) -> Result<()> {
        self.add_string(&keys::resolve(llm::TENSOR_DATA_LAYOUT, arch), layout)
    }

    pub fn add_head_count(&mut self, arch: &str, count: u32) -> Result<()> {
        self.add_uint32(&keys::resolve(attention::HEAD_COUNT, arch), count)
    }

    pub fn add_head_count_kv(&mut self, arch: &str, count: u32) -> Result<()> {
        self.add_uint32(&keys::resolve(attention::HEAD_COUNT_KV, arch), count)
    }

    pub fn add_max_alibi_bias(&mut self, arch: &str, bias: f32) -> Result<()> {
        self.add_float32(&keys::resolve(attention::MAX_ALIBI_BIAS, arch), bias)
    }

    pub fn add_clamp_kqv(&mut self, arch: &str, value: f32) -> Result<()> {
        self.add_float32(&keys::resolve(attention::CLAMP_KQV, arch), value)
    }

    pub fn add_layer_norm_eps(&mut self, arch: &str, eps: f32) -> Result<()> {
        self.add_float32(&keys::resolve(attention::LAYERNORM_EPS, arch), eps)
    }

    pub fn add_layer_norm_rms_eps(&mut self, arch: &str, eps: f32) -> Result<()> {
        self.add_float32(&keys::resolve(attention::LAYERNORM_RMS_EPS, arch), eps)
    }

    pub fn add_rope_dimension_count(&mut self, arch: &str, count: u32) -> Result<()> {
        self.add_uint32(&keys::resolve(rope::DIMENSION_COUNT, arch), count)
    }

    pub fn add_rope_scale(&mut self, arch: &str, scale: f32) -> Result<()> {
        self.add_float32(&keys::resolve(rope::SCALE, arch), scale)
    }

    // --- tokenizer ---------------------------------------------------------

    pub fn add_tokenizer_model(&mut self, model: &str) -> Result<()> {
        self.add_string(tokenizer::MODEL, model)
    }

    pub fn add_token_list<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<()> {
        self.add_array(tokenizer::LIST, tokens.iter().map(|t| -> &str { t.as_ref() }))
    }

    pub fn add_token_merges<S: AsRef<str>>(&mut self, merges: &[S]) -> Result<()> {
        self.add_array(tokenizer::MERGES, merges.iter().map(|m| -> &str { m.as_ref() }))
    }

    pub fn add_token_types(&mut self, types: &[i32]) -> Result<()> {
        self.add_array(tokenizer::TOKEN_TYPE, types.iter().copied())
    }

    pub fn add_token_scores(&mut self, scores: &[f32]) -> Result<()> {
        self.add_array(tokenizer::SCORES, scores.iter().copied())
    }

    pub fn add_bos_token_id(&mut self, id: u32) -> Result<()> {
        self.add_uint32(tokenizer::BOS_ID, id)
    }

    pub fn add_eos_token_id(&mut self, id: u32) -> Result<()> {
        self.add_uint32(tokenizer::EOS_ID, id)
    }

    pub fn add_unk_token_id(&mut self, id: u32) -> Result<()> {
        self.add_uint32(tokenizer::UNK_ID, id)
    }

    pub fn add_sep_token_id(&mut self, id: u32) -> Result<()> {
        self.add_uint32(tokenizer::SEP_ID, id)
    }

    pub fn add_pad_token_id(&mut self, id: u32) -> Result<()> {
        self.add_uint32(tokenizer::PAD_ID, id)
    }

    pub fn add_tokenizer_hf_json(&mut self, json: &str) -> Result<()> {
        self.add_string(tokenizer::HF_JSON, json)
    }

    pub fn add_tokenizer_rwkv_world(&mut self, world: &str) -> Result<()> {
        self.add_string(tokenizer::RWKV, world)
    }
}
