//! Engine pooling.
//!
//! A single engine instance must not run concurrent recognitions, so each
//! job acquires its own engine for the duration of the call. Idle engines
//! are kept for reuse up to a cap; the guard returns its engine on drop,
//! including when the job panics or is abandoned mid-call.

use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

use crate::error::OcrError;
use crate::tesseract::{TesseractConfig, TesseractEngine};

const DEFAULT_MAX_IDLE: usize = 4;

/// Pool of reusable Tesseract engines.
pub struct EnginePool {
    config: TesseractConfig,
    idle: Mutex<Vec<TesseractEngine>>,
    max_idle: usize,
}

impl EnginePool {
    /// Create a pool, validating the engine configuration by constructing
    /// one engine eagerly.
    pub fn new(config: TesseractConfig) -> Result<Self, OcrError> {
        let first = TesseractEngine::new(config.clone())?;
        Ok(Self {
            config,
            idle: Mutex::new(vec![first]),
            max_idle: DEFAULT_MAX_IDLE,
        })
    }

    pub fn with_max_idle(mut self, max_idle: usize) -> Self {
        self.max_idle = max_idle.max(1);
        self
    }

    /// Acquire an engine for one job.
    ///
    /// Reuses an idle engine when available, otherwise constructs a fresh
    /// one so concurrent jobs never share an instance.
    pub fn acquire(&self) -> Result<PooledEngine<'_>, OcrError> {
        let reused = {
            let mut idle = self
                .idle
                .lock()
                .map_err(|_| OcrError::EngineUnavailable("engine pool poisoned".into()))?;
            idle.pop()
        };

        let engine = match reused {
            Some(engine) => engine,
            None => {
                log::debug!("[OCR] pool empty, constructing engine");
                TesseractEngine::new(self.config.clone())?
            }
        };

        Ok(PooledEngine {
            pool: self,
            engine: Some(engine),
        })
    }

    fn release(&self, engine: TesseractEngine) {
        if let Ok(mut idle) = self.idle.lock() {
            if idle.len() < self.max_idle {
                idle.push(engine);
            }
        }
    }
}

/// RAII guard over a pooled engine; returns the engine on drop.
pub struct PooledEngine<'a> {
    pool: &'a EnginePool,
    engine: Option<TesseractEngine>,
}

impl Deref for PooledEngine<'_> {
    type Target = TesseractEngine;

    fn deref(&self) -> &Self::Target {
        self.engine.as_ref().expect("engine present until drop")
    }
}

impl DerefMut for PooledEngine<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.engine.as_mut().expect("engine present until drop")
    }
}

impl Drop for PooledEngine<'_> {
    fn drop(&mut self) {
        if let Some(engine) = self.engine.take() {
            self.pool.release(engine);
        }
    }
}
