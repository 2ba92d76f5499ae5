use std::{
    io::{ErrorKind, Write},
    path::Path,
    process::{Command, Stdio},
};

use crate::{config::RenderConfig, error::RenderError};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Turns a DOT document into an image.
pub trait GraphRenderer {
    fn render(&self, dot: &str) -> Result<RenderedImage, RenderError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub bytes: Vec<u8>,
    pub format: String,
    /// Width and height in pixels, only known for PNG output.
    pub dimensions: Option<(u32, u32)>,
}

impl RenderedImage {
    /// Wraps renderer output, checking that it actually is an image of the
    /// requested format.
    pub fn decode(bytes: Vec<u8>, format: &str) -> Result<Self, RenderError> {
        if bytes.is_empty() {
            return Err(RenderError::InvalidImage("renderer produced no output".into()));
        }

        let dimensions = if format.eq_ignore_ascii_case("png") {
            Some(png_dimensions(&bytes)?)
        } else {
            None
        };

        Ok(RenderedImage {
            bytes,
            format: format.to_string(),
            dimensions,
        })
    }

    /// Writes the image to `path`, replacing any existing file.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}

/// Reads width and height from the IHDR chunk, which the PNG format requires
/// to come first.
fn png_dimensions(bytes: &[u8]) -> Result<(u32, u32), RenderError> {
    if bytes.len() < 24 || bytes[..8] != PNG_SIGNATURE {
        return Err(RenderError::InvalidImage("missing PNG signature".into()));
    }
    if &bytes[12..16] != b"IHDR" {
        return Err(RenderError::InvalidImage("missing PNG header chunk".into()));
    }

    let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);

    if width == 0 || height == 0 {
        return Err(RenderError::InvalidImage(format!(
            "image has size {width}x{height}"
        )));
    }

    Ok((width, height))
}

/// Renders through the Graphviz command line tool, `dot -T<format>` by
/// default. The DOT text is piped to stdin and the image read from stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphvizRenderer {
    command: String,
    format: String,
}

impl GraphvizRenderer {
    pub fn new(command: impl Into<String>, format: impl Into<String>) -> Self {
        GraphvizRenderer {
            command: command.into(),
            format: format.into(),
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        GraphvizRenderer::new(config.get_command().clone(), config.get_format().clone())
    }
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        GraphvizRenderer::from_config(&RenderConfig::default())
    }
}

impl GraphRenderer for GraphvizRenderer {
    fn render(&self, dot: &str) -> Result<RenderedImage, RenderError> {
        tracing::trace!("Rendering dot representation\n{}", dot);

        let mut child = Command::new(&self.command)
            .arg(format!("-T{}", self.format))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        // stdin is dropped at the end of this block, which closes the pipe
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(dot.as_bytes()) {
                // the renderer quit before reading everything, its exit
                // status is checked below
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    tracing::debug!("Renderer closed its input early");
                }
                result => result?,
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(RenderError::Exit {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        RenderedImage::decode(output.stdout, &self.format)
    }
}
