use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, Object};

#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    dictionary: Dictionary,
    data: Vec<u8>,
}

impl Stream {
    pub fn new(data: Vec<u8>) -> Self {
        Self::with_dictionary(Dictionary::new(), data)
    }

    pub fn with_dictionary(dictionary: Dictionary, data: Vec<u8>) -> Self {
        let mut dict = dictionary;
        dict.set("Length", data.len() as i64);

        Self {
            dictionary: dict,
            data,
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn dictionary_mut(&mut self) -> &mut Dictionary {
        &mut self.dictionary
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Replaces the payload and keeps `/Length` in sync.
    pub fn set_data(&mut self, data: Vec<u8>) {
        self.data = data;
        self.dictionary.set("Length", self.data.len() as i64);
    }

    /// Sets `/Filter`, prepending to any filter already present.
    pub fn add_filter(&mut self, filter: &str) {
        let name = Object::name(filter);
        let combined = match self.dictionary.remove("Filter") {
            None => name,
            Some(Object::Array(mut filters)) => {
                filters.insert(0, name);
                Object::Array(filters)
            }
            Some(existing) => Object::Array(vec![name, existing]),
        };
        self.dictionary.set("Filter", combined);
    }

    pub fn set_decode_params(&mut self, params: Dictionary) {
        self.dictionary.set("DecodeParms", params);
    }

    pub fn is_compressed(&self) -> bool {
        match self.dictionary.get("Filter") {
            Some(Object::Name(name)) => name == "FlateDecode",
            Some(Object::Array(filters)) => filters
                .iter()
                .any(|f| f.as_name() == Some("FlateDecode")),
            _ => false,
        }
    }

    #[cfg(feature = "compression")]
    pub fn compress_flate(&mut self) -> Result<()> {
        let compressed = crate::compression::compress(&self.data)?;
        self.set_data(compressed);
        self.add_filter("FlateDecode");
        Ok(())
    }

    #[cfg(not(feature = "compression"))]
    pub fn compress_flate(&mut self) -> Result<()> {
        Err(PdfError::UnsupportedFunc("Zlib"))
    }

    /// Applies a length-preserving transform (RC4) to the payload.
    pub(crate) fn transform_data(&mut self, f: impl FnOnce(&[u8]) -> Vec<u8>) -> Result<()> {
        let transformed = f(&self.data);
        if transformed.len() != self.data.len() {
            return Err(PdfError::Consistency(
                "stream transform changed the payload length".to_string(),
            ));
        }
        self.data = transformed;
        Ok(())
    }
}
