use serde::{Deserialize, Serialize};

/// Default value of `countsDtype` when a descriptor omits it.
pub const DEFAULT_COUNTS_DTYPE: &str = "int32";

/// Byte order of the raw counts array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

impl Endianness {
    /// Interprets an `endianness` tag from a metadata descriptor.
    ///
    /// Matching is a case-insensitive prefix match: anything starting with `big`
    /// selects big-endian, everything else (including a missing tag) is little-endian.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some(tag) if tag.trim().to_ascii_lowercase().starts_with("big") => Endianness::Big,
            _ => Endianness::Little,
        }
    }

    /// Decodes a single 32-bit signed integer in this byte order.
    pub fn read_i32(self, bytes: [u8; 4]) -> i32 {
        match self {
            Endianness::Little => i32::from_le_bytes(bytes),
            Endianness::Big => i32::from_be_bytes(bytes),
        }
    }
}

/// Per-algorithm descriptor written next to the counts array by the hash test run.
///
/// The writer also emits `hashBits`, `bucketIndexFormula` and `expectedMeanPerBucket`;
/// those keys are accepted and ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmMeta {
    /// Identifier of the hash algorithm under test
    pub algorithm: String,
    /// Number of buckets in the table under test
    pub num_buckets: u64,
    /// Number of items hashed into the table
    pub num_inputs: u64,
    /// Path of the counts array, relative to the descriptor's directory
    pub counts_file: String,
    /// Element type tag of the counts array; counts are always read as 32-bit signed integers
    #[serde(default = "default_counts_dtype")]
    pub counts_dtype: String,
    /// Byte order tag, `little` or `big`
    #[serde(default)]
    pub endianness: Option<String>,
}

fn default_counts_dtype() -> String {
    DEFAULT_COUNTS_DTYPE.to_string()
}

impl AlgorithmMeta {
    /// Byte order declared by this descriptor.
    pub fn endianness(&self) -> Endianness {
        Endianness::from_tag(self.endianness.as_deref())
    }

    /// Average occupancy per bucket (λ).
    pub fn rate(&self) -> f64 {
        crate::analysis::poisson::occupancy_rate(self.num_inputs, self.num_buckets)
    }

    /// Whether `countsDtype` names a 32-bit signed integer.
    pub fn has_i32_dtype(&self) -> bool {
        matches!(
            self.counts_dtype.trim().to_ascii_lowercase().as_str(),
            "int32" | "i32" | "i4" | "<i4" | ">i4" | "=i4"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest(tag, expected,
        case(Some("little"), Endianness::Little),
        case(Some("LITTLE"), Endianness::Little),
        case(Some("little-endian"), Endianness::Little),
        case(Some("big"), Endianness::Big),
        case(Some("Big-Endian"), Endianness::Big),
        case(Some("BIG"), Endianness::Big),
        case(Some("middle"), Endianness::Little), // Unrecognized, defaults to little
        case(Some(""), Endianness::Little),
        case(None, Endianness::Little)
    )]
    fn endianness_tag_is_prefix_matched(tag: Option<&str>, expected: Endianness) {
        assert_eq!(Endianness::from_tag(tag), expected);
    }

    #[test]
    fn read_i32_honors_byte_order() {
        let bytes = [0x01, 0x00, 0x00, 0x00];
        assert_eq!(Endianness::Little.read_i32(bytes), 1);
        assert_eq!(Endianness::Big.read_i32(bytes), 0x0100_0000);
    }

    #[test]
    fn deserializes_camel_case_descriptor() {
        let json = r#"{
            "algorithm": "xxh3",
            "numBuckets": 1024,
            "numInputs": 4096,
            "countsFile": "xxh3_counts_i32_le.bin",
            "countsDtype": "<i4",
            "endianness": "little"
        }"#;
        let meta: AlgorithmMeta = serde_json::from_str(json).unwrap();

        assert_eq!(meta.algorithm, "xxh3");
        assert_eq!(meta.num_buckets, 1024);
        assert_eq!(meta.num_inputs, 4096);
        assert_eq!(meta.counts_file, "xxh3_counts_i32_le.bin");
        assert_eq!(meta.endianness(), Endianness::Little);
        assert!(meta.has_i32_dtype());
        assert_eq!(meta.rate(), 4.0);
    }

    #[test]
    fn optional_fields_use_defaults() {
        let json = r#"{
            "algorithm": "fnv1a",
            "numBuckets": 8,
            "numInputs": 8,
            "countsFile": "fnv1a.bin"
        }"#;
        let meta: AlgorithmMeta = serde_json::from_str(json).unwrap();

        assert_eq!(meta.counts_dtype, DEFAULT_COUNTS_DTYPE);
        assert_eq!(meta.endianness, None);
        assert_eq!(meta.endianness(), Endianness::Little);
    }

    #[rstest(dtype, expected,
        case("int32", true),
        case("INT32", true),
        case("<i4", true),
        case(">i4", true),
        case("i32", true),
        case("int64", false),
        case("<u4", false),
        case("float32", false)
    )]
    fn recognizes_i32_dtype_aliases(dtype: &str, expected: bool) {
        let meta = AlgorithmMeta {
            algorithm: "test".to_string(),
            num_buckets: 1,
            num_inputs: 1,
            counts_file: "test.bin".to_string(),
            counts_dtype: dtype.to_string(),
            endianness: None,
        };
        assert_eq!(meta.has_i32_dtype(), expected);
    }
}
