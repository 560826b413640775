use anyhow::{anyhow, Result};
use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;

const PAD_ID: u32 = 1;

/// Encodes a batch into `[B, max_len]` id and attention-mask tensors, truncating or padding each row.
pub fn tokenize_batch(tokenizer: &Tokenizer, texts: &[String], max_len: usize, device: &Device) -> Result<(Tensor, Tensor)> {
    let mut ids = Vec::with_capacity(texts.len() * max_len);
    let mut mask = Vec::with_capacity(texts.len() * max_len);
    for text in texts {
        let enc = tokenizer.encode(text.as_str(), true).map_err(|e| anyhow!("Tokenization failed: {}", e))?;
        let row_ids = enc.get_ids();
        let row_mask = enc.get_attention_mask();
        let kept = row_ids.len().min(max_len);
        ids.extend_from_slice(&row_ids[..kept]);
        mask.extend_from_slice(&row_mask[..kept]);
        ids.extend(std::iter::repeat(PAD_ID).take(max_len - kept));
        mask.extend(std::iter::repeat(0u32).take(max_len - kept));
    }
    let batch = texts.len();
    let input_ids = Tensor::from_vec(ids, (batch, max_len), device)?;
    let attention_mask = Tensor::from_vec(mask, (batch, max_len), device)?;
    Ok((input_ids, attention_mask))
}
