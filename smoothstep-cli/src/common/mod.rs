//! Checkpoint I/O shared between subcommands.
//!
//! Loads a .safetensors file into the in-memory weight store and writes a
//! store back out. The three float kinds get typed storage; every other
//! dtype is carried as raw bytes so it round-trips byte-identically.

use anyhow::{Context, Result};
use half::{bf16, f16};
use safetensors::tensor::TensorView;
use safetensors::{Dtype, SafeTensors};
use smooth_transform::{Model, Tensor, TensorData, WeightStore};
use std::fs;
use std::path::Path;

/// Load a .safetensors checkpoint into a model.
pub fn load_checkpoint(path: &str) -> Result<Model> {
    let path = Path::new(path);
    if path.extension().and_then(|s| s.to_str()) != Some("safetensors") {
        anyhow::bail!("Expected .safetensors file, got: {}", path.display());
    }

    let data = fs::read(path).with_context(|| format!("Failed to read: {}", path.display()))?;
    let st = SafeTensors::deserialize(&data)
        .with_context(|| format!("Failed to parse: {}", path.display()))?;

    let mut weights = WeightStore::new();
    for (name, view) in st.tensors() {
        let tensor =
            view_to_tensor(&view).with_context(|| format!("Failed to load tensor '{}'", name))?;
        weights.insert(name, tensor);
    }

    Ok(Model::new(weights))
}

/// Write a model's weights out as a .safetensors file.
pub fn save_checkpoint(model: &Model, path: &str) -> Result<()> {
    // Materialize byte buffers first; the views borrow them
    let mut buffers: Vec<(String, Dtype, Vec<usize>, Vec<u8>)> = Vec::new();
    for (name, tensor) in model.weights().iter() {
        let dtype = tensor_dtype(tensor)
            .with_context(|| format!("Cannot serialize tensor '{}'", name))?;
        buffers.push((
            name.to_string(),
            dtype,
            tensor.shape().to_vec(),
            tensor_bytes(tensor),
        ));
    }

    let views: Vec<(String, TensorView)> = buffers
        .iter()
        .map(|(name, dtype, shape, bytes)| {
            let view = TensorView::new(*dtype, shape.clone(), bytes)
                .with_context(|| format!("Invalid tensor view for '{}'", name))?;
            Ok((name.clone(), view))
        })
        .collect::<Result<_>>()?;

    safetensors::serialize_to_file(views, &None, Path::new(path))
        .with_context(|| format!("Failed to write: {}", path))?;
    Ok(())
}

fn view_to_tensor(view: &TensorView) -> Result<Tensor> {
    let shape = view.shape().to_vec();
    let count: usize = shape.iter().product();
    let data = view.data();

    let storage = match view.dtype() {
        Dtype::F32 => TensorData::F32(bytes_to_f32(data, count)?),
        Dtype::F16 => TensorData::F16(bytes_to_f16(data, count)?),
        Dtype::BF16 => TensorData::BF16(bytes_to_bf16(data, count)?),
        other => TensorData::Other {
            kind: dtype_to_string(other).to_string(),
            bytes: data.to_vec(),
        },
    };

    Ok(Tensor::new(shape, storage))
}

fn bytes_to_f32(data: &[u8], count: usize) -> Result<Vec<f32>> {
    if data.len() != count * 4 {
        anyhow::bail!("F32 size mismatch: expected {} bytes, got {}", count * 4, data.len());
    }
    Ok(data
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes(c.try_into().unwrap()))
        .collect())
}

fn bytes_to_f16(data: &[u8], count: usize) -> Result<Vec<f16>> {
    if data.len() != count * 2 {
        anyhow::bail!("F16 size mismatch: expected {} bytes, got {}", count * 2, data.len());
    }
    Ok(data
        .chunks_exact(2)
        .map(|c| f16::from_le_bytes([c[0], c[1]]))
        .collect())
}

fn bytes_to_bf16(data: &[u8], count: usize) -> Result<Vec<bf16>> {
    if data.len() != count * 2 {
        anyhow::bail!("BF16 size mismatch: expected {} bytes, got {}", count * 2, data.len());
    }
    Ok(data
        .chunks_exact(2)
        .map(|c| bf16::from_le_bytes([c[0], c[1]]))
        .collect())
}

fn tensor_bytes(tensor: &Tensor) -> Vec<u8> {
    match tensor.data() {
        TensorData::F32(values) => values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        TensorData::F16(values) => values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        TensorData::BF16(values) => values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        TensorData::Other { bytes, .. } => bytes.clone(),
    }
}

fn tensor_dtype(tensor: &Tensor) -> Result<Dtype> {
    match tensor.data() {
        TensorData::F32(_) => Ok(Dtype::F32),
        TensorData::F16(_) => Ok(Dtype::F16),
        TensorData::BF16(_) => Ok(Dtype::BF16),
        TensorData::Other { kind, .. } => parse_dtype(kind),
    }
}

fn dtype_to_string(dtype: Dtype) -> &'static str {
    match dtype {
        Dtype::BOOL => "BOOL",
        Dtype::U8 => "U8",
        Dtype::I8 => "I8",
        Dtype::I16 => "I16",
        Dtype::U16 => "U16",
        Dtype::I32 => "I32",
        Dtype::U32 => "U32",
        Dtype::I64 => "I64",
        Dtype::U64 => "U64",
        Dtype::F16 => "F16",
        Dtype::BF16 => "BF16",
        Dtype::F32 => "F32",
        Dtype::F64 => "F64",
        _ => "UNKNOWN",
    }
}

fn parse_dtype(kind: &str) -> Result<Dtype> {
    match kind {
        "BOOL" => Ok(Dtype::BOOL),
        "U8" => Ok(Dtype::U8),
        "I8" => Ok(Dtype::I8),
        "I16" => Ok(Dtype::I16),
        "U16" => Ok(Dtype::U16),
        "I32" => Ok(Dtype::I32),
        "U32" => Ok(Dtype::U32),
        "I64" => Ok(Dtype::I64),
        "U64" => Ok(Dtype::U64),
        "F64" => Ok(Dtype::F64),
        _ => anyhow::bail!("Unsupported element kind: {}", kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smooth_transform::ElementKind;
    use tempfile::TempDir;

    fn sample_model() -> Model {
        let mut weights = WeightStore::new();
        weights.insert(
            "diffusion_model.input_blocks.0.weight",
            Tensor::from_f32(vec![2, 2], vec![0.0, 0.25, 0.5, 1.0]),
        );
        weights.insert(
            "first_stage_model.weight",
            Tensor::from_f16(vec![2], vec![f16::from_f32(1.5), f16::from_f32(-2.0)]),
        );
        weights.insert(
            "cond_stage_model.ids",
            Tensor::new(
                vec![2],
                TensorData::Other {
                    kind: "I64".to_string(),
                    bytes: 7i64
                        .to_le_bytes()
                        .iter()
                        .chain(42i64.to_le_bytes().iter())
                        .copied()
                        .collect(),
                },
            ),
        );
        Model::new(weights)
    }

    // ==================== byte conversion tests ====================

    #[test]
    fn test_bytes_to_f32_roundtrip() {
        let values = vec![1.0f32, -2.5, 0.0, 3.25];
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        assert_eq!(bytes_to_f32(&bytes, 4).unwrap(), values);
    }

    #[test]
    fn test_bytes_to_f32_size_mismatch() {
        let result = bytes_to_f32(&[0u8; 12], 4);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("size mismatch"));
    }

    #[test]
    fn test_bytes_to_f16_roundtrip() {
        let values = vec![f16::from_f32(0.5), f16::from_f32(-1.0)];
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        assert_eq!(bytes_to_f16(&bytes, 2).unwrap(), values);
    }

    #[test]
    fn test_bytes_to_bf16_roundtrip() {
        let values = vec![bf16::from_f32(1.5), bf16::from_f32(3.0)];
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        assert_eq!(bytes_to_bf16(&bytes, 2).unwrap(), values);
    }

    // ==================== dtype mapping tests ====================

    #[test]
    fn test_parse_dtype_inverts_dtype_to_string() {
        for dtype in [Dtype::BOOL, Dtype::U8, Dtype::I32, Dtype::I64, Dtype::F64] {
            assert_eq!(parse_dtype(dtype_to_string(dtype)).unwrap(), dtype);
        }
    }

    #[test]
    fn test_parse_unknown_dtype_fails() {
        assert!(parse_dtype("UNKNOWN").is_err());
    }

    // ==================== file roundtrip tests ====================

    #[test]
    fn test_checkpoint_roundtrip_preserves_everything() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.safetensors");
        let path = path.to_str().unwrap();

        let model = sample_model();
        save_checkpoint(&model, path).unwrap();
        let loaded = load_checkpoint(path).unwrap();

        assert_eq!(loaded.weights().len(), 3);
        for (name, tensor) in model.weights().iter() {
            let reloaded = loaded.weights().get(name).unwrap();
            assert_eq!(reloaded, tensor, "mismatch for {name}");
        }
        assert_eq!(
            loaded.weights().get("cond_stage_model.ids").unwrap().kind(),
            ElementKind::Other
        );
    }

    #[test]
    fn test_load_rejects_wrong_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.bin");
        fs::write(&path, b"junk").unwrap();

        let result = load_checkpoint(path.to_str().unwrap());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Expected .safetensors"));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.safetensors");
        fs::write(&path, b"not a safetensors file").unwrap();

        assert!(load_checkpoint(path.to_str().unwrap()).is_err());
    }
}
