//! Pooled redaction facade.

use image::DynamicImage;

use proefrit_document::DocumentClass;
use proefrit_ocr::{EngineInfo, EnginePool, TesseractConfig};

use crate::error::RedactionError;
use crate::options::RedactionOptions;
use crate::pipeline::{self, RedactionOutput, RedactionReport};

/// Entry point for callers: owns the engine pool and the options, runs
/// the pipeline with a pooled engine per call. Safe to share across
/// threads; concurrent calls never share an engine instance.
pub struct Redactor {
    pool: EnginePool,
    options: RedactionOptions,
}

impl Redactor {
    /// Create a redactor, validating the OCR installation up front.
    pub fn new(
        config: TesseractConfig,
        options: RedactionOptions,
    ) -> Result<Self, RedactionError> {
        let pool = EnginePool::new(config)?;
        Ok(Self { pool, options })
    }

    pub fn options(&self) -> &RedactionOptions {
        &self.options
    }

    /// Engine identification of a pooled engine, for audit logging.
    pub fn engine_info(&self) -> Result<EngineInfo, RedactionError> {
        use proefrit_ocr::OcrEngine;
        let engine = self.pool.acquire()?;
        Ok(engine.info())
    }

    /// Redact encoded image bytes; returns JPEG bytes plus the report.
    pub fn redact_bytes(
        &self,
        bytes: &[u8],
        class: DocumentClass,
    ) -> Result<(Vec<u8>, RedactionReport), RedactionError> {
        let image = pipeline::validate_input(bytes, &self.options)?;
        let output = self.redact_image(&image, class)?;

        match output.image {
            Some(redacted) => {
                let jpeg = proefrit_render::encode_jpeg(&redacted, self.options.jpeg_quality)?;
                Ok((jpeg, output.report))
            }
            None => Err(RedactionError::Pipeline(
                output.report.errors.join("; "),
            )),
        }
    }

    /// Redact an already decoded image.
    pub fn redact_image(
        &self,
        image: &DynamicImage,
        class: DocumentClass,
    ) -> Result<RedactionOutput, RedactionError> {
        let mut engine = self.pool.acquire()?;
        Ok(pipeline::run(&mut *engine, image, class, &self.options))
    }
}
