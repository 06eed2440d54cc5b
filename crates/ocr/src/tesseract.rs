//! Tesseract OCR engine (CLI wrapper).

use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use image::DynamicImage;
use proefrit_geometry::{union_all, PixelBox};
use serde::{Deserialize, Serialize};

use crate::error::OcrError;
use crate::{EngineInfo, OcrEngine, OcrLine, OcrOutput, OcrWord};

const DEFAULT_LANGUAGES: &[&str] = &["nld", "eng"];
const DEFAULT_PSM: u8 = 6;
const DEFAULT_OEM: u8 = 1;
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const POLL_INTERVAL: Duration = Duration::from_millis(25);

static JOB_SEQ: AtomicU64 = AtomicU64::new(0);

/// Tesseract configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TesseractConfig {
    /// Path to the tesseract executable; falls back to `tesseract` on PATH.
    pub binary_path: Option<String>,
    /// tessdata directory, exported as `TESSDATA_PREFIX`.
    pub tessdata_path: Option<String>,
    /// Language models, e.g. `["nld", "eng"]`.
    pub languages: Vec<String>,
    /// Page segmentation mode (0-13).
    pub psm: Option<u8>,
    /// Engine mode (0-3).
    pub oem: Option<u8>,
    /// Recognition deadline; the child process is killed on expiry.
    pub timeout_ms: Option<u64>,
}

impl TesseractConfig {
    pub fn languages_or_default(&self) -> Vec<String> {
        if self.languages.is_empty() {
            DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect()
        } else {
            self.languages.clone()
        }
    }

    pub fn psm_or_default(&self) -> u8 {
        env_u8("PROEFRIT_OCR_PSM")
            .or(self.psm)
            .unwrap_or(DEFAULT_PSM)
    }

    pub fn oem_or_default(&self) -> u8 {
        self.oem.unwrap_or(DEFAULT_OEM)
    }

    pub fn timeout_ms_or_default(&self) -> u64 {
        env_u64("PROEFRIT_OCR_TIMEOUT_MS")
            .or(self.timeout_ms)
            .unwrap_or(DEFAULT_TIMEOUT_MS)
    }
}

/// Tesseract CLI engine.
pub struct TesseractEngine {
    config: TesseractConfig,
    version: Option<String>,
}

impl TesseractEngine {
    /// Create an engine, validating the binary up front.
    pub fn new(config: TesseractConfig) -> Result<Self, OcrError> {
        let binary = config.binary_path.as_deref().unwrap_or("tesseract");
        let version = get_tesseract_version(binary)
            .map_err(OcrError::EngineUnavailable)?;

        log::info!("[OCR] tesseract {} ready", version);

        Ok(Self {
            config,
            version: Some(version),
        })
    }

    fn binary_path(&self) -> &str {
        self.config.binary_path.as_deref().unwrap_or("tesseract")
    }

    fn run_tesseract(
        &self,
        input: &std::path::Path,
        out_base: &std::path::Path,
        languages: &[String],
        stderr_log: &std::path::Path,
    ) -> Result<(), OcrError> {
        let lang = languages.join("+");
        let timeout_ms = self.config.timeout_ms_or_default();

        // Stderr goes to a file like the TSV does. An undrained pipe fills
        // up under chatty diagnostics and stalls the child until the
        // deadline.
        let stderr_file = std::fs::File::create(stderr_log)?;

        let mut cmd = Command::new(self.binary_path());
        cmd.arg(input)
            .arg(out_base)
            .arg("-l")
            .arg(&lang)
            .arg("--psm")
            .arg(self.config.psm_or_default().to_string())
            .arg("--oem")
            .arg(self.config.oem_or_default().to_string())
            .arg("tsv")
            .stdout(Stdio::null())
            .stderr(Stdio::from(stderr_file));

        if let Some(tessdata) = &self.config.tessdata_path {
            cmd.env("TESSDATA_PREFIX", tessdata);
        }

        log::info!(
            "[OCR] tesseract -l {} --psm {} --oem {} tsv (timeout {} ms)",
            lang,
            self.config.psm_or_default(),
            self.config.oem_or_default(),
            timeout_ms
        );

        let mut child = cmd
            .spawn()
            .map_err(|e| OcrError::EngineUnavailable(format!("spawn tesseract: {}", e)))?;

        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(OcrError::Timeout(timeout_ms));
            }
            std::thread::sleep(POLL_INTERVAL);
        };

        if !status.success() {
            let stderr = std::fs::read_to_string(stderr_log).unwrap_or_default();
            return Err(OcrError::Recognition(format!(
                "tesseract exited with {}: {}",
                status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(
        &mut self,
        image: &DynamicImage,
        languages: &[String],
    ) -> Result<OcrOutput, OcrError> {
        let start = Instant::now();

        let temp_dir = std::env::temp_dir();
        let job = JOB_SEQ.fetch_add(1, Ordering::Relaxed);
        let base = format!("proefrit_ocr_{}_{}", std::process::id(), job);
        let input = temp_dir.join(format!("{}.png", base));
        let out_base = temp_dir.join(&base);
        // Tesseract appends the format extension to the output base.
        let tsv_path = temp_dir.join(format!("{}.tsv", base));
        let stderr_log = temp_dir.join(format!("{}.stderr.log", base));

        image
            .save(&input)
            .map_err(|e| OcrError::Image(format!("write temp image: {}", e)))?;

        let languages = if languages.is_empty() {
            self.config.languages_or_default()
        } else {
            languages.to_vec()
        };

        let run_result = self.run_tesseract(&input, &out_base, &languages, &stderr_log);
        let _ = std::fs::remove_file(&input);
        let _ = std::fs::remove_file(&stderr_log);

        run_result.inspect_err(|_| {
            let _ = std::fs::remove_file(&tsv_path);
        })?;

        let tsv = std::fs::read_to_string(&tsv_path)?;
        let _ = std::fs::remove_file(&tsv_path);

        let output = parse_tesseract_tsv(&tsv);

        log::info!(
            "[OCR] recognized {} words / {} lines in {} ms",
            output.words.len(),
            output.lines.len(),
            start.elapsed().as_millis()
        );

        Ok(output)
    }

    fn info(&self) -> EngineInfo {
        EngineInfo {
            version: self.version.clone(),
            languages: self.config.languages_or_default(),
            psm: self.config.psm_or_default(),
            oem: self.config.oem_or_default(),
        }
    }
}

/// Parse Tesseract TSV output into words and lines.
///
/// TSV columns:
/// level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
///
/// Words are the level-5 rows. Lines are rebuilt by grouping words per
/// (page, block, par, line) in encounter order, with a union bbox and the
/// mean word confidence.
fn parse_tesseract_tsv(tsv: &str) -> OcrOutput {
    struct LineAcc {
        key: (u32, u32, u32, u32),
        texts: Vec<String>,
        boxes: Vec<PixelBox>,
        conf_sum: f32,
    }

    let mut words = Vec::new();
    let mut line_accs: Vec<LineAcc> = Vec::new();

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 {
            continue;
        }

        let level: i32 = cols[0].parse().unwrap_or(-1);
        if level != 5 {
            continue;
        }

        let key = (
            cols[1].parse().unwrap_or(0),
            cols[2].parse().unwrap_or(0),
            cols[3].parse().unwrap_or(0),
            cols[4].parse().unwrap_or(0),
        );
        let left: i64 = cols[6].parse().unwrap_or(0);
        let top: i64 = cols[7].parse().unwrap_or(0);
        let width: i64 = cols[8].parse().unwrap_or(0);
        let height: i64 = cols[9].parse().unwrap_or(0);
        let conf: f32 = cols[10].parse().unwrap_or(-1.0);
        let text = cols[11].trim();

        // Skip empty text and rows Tesseract marks as non-words (conf -1).
        if text.is_empty() || conf < 0.0 {
            continue;
        }

        let bbox = PixelBox::new(
            left.max(0) as u32,
            top.max(0) as u32,
            width.max(0) as u32,
            height.max(0) as u32,
        );

        words.push(OcrWord {
            text: text.to_string(),
            confidence: conf,
            bbox,
        });

        match line_accs.iter_mut().find(|acc| acc.key == key) {
            Some(acc) => {
                acc.texts.push(text.to_string());
                acc.boxes.push(bbox);
                acc.conf_sum += conf;
            }
            None => line_accs.push(LineAcc {
                key,
                texts: vec![text.to_string()],
                boxes: vec![bbox],
                conf_sum: conf,
            }),
        }
    }

    let lines: Vec<OcrLine> = line_accs
        .into_iter()
        .filter_map(|acc| {
            let bbox = union_all(&acc.boxes)?;
            let count = acc.texts.len() as f32;
            Some(OcrLine {
                text: acc.texts.join(" "),
                confidence: acc.conf_sum / count,
                bbox,
            })
        })
        .collect();

    let text = lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    OcrOutput { text, words, lines }
}

/// Probe the tesseract binary and return its version.
pub fn get_tesseract_version(binary_path: &str) -> Result<String, String> {
    let output = Command::new(binary_path)
        .arg("--version")
        .output()
        .map_err(|e| format!("cannot execute {}: {}", binary_path, e))?;

    if !output.status.success() {
        return Err(format!("{} --version failed", binary_path));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let combined = format!("{}{}", stdout, stderr);

    for line in combined.lines() {
        if line.contains("tesseract") {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() >= 2 {
                return Ok(parts[1].trim_start_matches('v').to_string());
            }
        }
    }

    Ok("unknown".to_string())
}

fn env_u8(key: &str) -> Option<u8> {
    std::env::var(key).ok()?.parse::<u8>().ok()
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok()?.parse::<u64>().ok()
}
