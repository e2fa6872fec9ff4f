//! External renderer invocation
//!
//! Rasterization is delegated to the `XMLToPng` executable: the prepared
//! skin XML goes in on stdin and the PNG comes back on stdout. The call is
//! synchronous but bounded, a renderer that hangs is killed when the
//! timeout expires.

use std::io::{Read, Write};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::{Error, Result};

/// File name of the external renderer executable
#[cfg(windows)]
pub const RENDERER_BINARY: &str = "XMLToPng.exe";
/// File name of the external renderer executable
#[cfg(not(windows))]
pub const RENDERER_BINARY: &str = "XMLToPng";

/// Default cap on a single renderer run
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(10);

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Preference values passed to the renderer for one run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Language overlay file name, empty for the skin's default strings
    pub language: String,
    /// Button state to draw, e.g. `normal` or `hover`
    pub button_state: String,
}

/// Converts prepared skin XML into PNG bytes
pub trait Renderer {
    fn render(&self, xml: &str, options: &RenderOptions) -> Result<Vec<u8>>;
}

/// Invokes the external `XMLToPng` executable
pub struct XmlToPngRenderer {
    binary: PathBuf,
    skin_dir: PathBuf,
    timeout: Duration,
}

impl XmlToPngRenderer {
    /// Use an explicit renderer executable.
    pub fn new(binary: impl Into<PathBuf>, skin_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            skin_dir: skin_dir.into(),
            timeout: DEFAULT_RENDER_TIMEOUT,
        }
    }

    /// Resolve the renderer next to the current executable, falling back to
    /// a bare `XMLToPng` looked up on `PATH`.
    pub fn discover(skin_dir: impl Into<PathBuf>) -> Self {
        let sibling = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(RENDERER_BINARY)))
            .filter(|candidate| candidate.exists());

        let binary = sibling.unwrap_or_else(|| PathBuf::from(RENDERER_BINARY));
        tracing::debug!(renderer = %binary.display(), "resolved renderer");
        Self::new(binary, skin_dir)
    }

    /// Override the default timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point the renderer at a different skin resource directory.
    pub fn set_skin_dir(&mut self, skin_dir: impl Into<PathBuf>) {
        self.skin_dir = skin_dir.into();
    }

    /// Skin resource directory passed on every invocation
    pub fn skin_dir(&self) -> &Path {
        &self.skin_dir
    }

    /// Renderer executable this instance invokes
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Argument list for one invocation.
    pub fn args(&self, options: &RenderOptions) -> Vec<String> {
        // The renderer concatenates resource names straight onto skin_path,
        // so the trailing separator matters.
        let mut skin_path = self.skin_dir.display().to_string();
        if !skin_path.ends_with(MAIN_SEPARATOR) {
            skin_path.push(MAIN_SEPARATOR);
        }

        vec![
            format!("--button_state={}", options.button_state),
            format!("--language={}", options.language),
            format!("--skin_path={skin_path}"),
        ]
    }
}

impl Renderer for XmlToPngRenderer {
    fn render(&self, xml: &str, options: &RenderOptions) -> Result<Vec<u8>> {
        let args = self.args(options);
        tracing::debug!(renderer = %self.binary.display(), ?args, "invoking renderer");

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::RendererSpawn {
                path: self.binary.clone(),
                source,
            })?;

        // Start draining both pipes before feeding stdin so a chatty
        // renderer cannot deadlock against a full pipe buffer.
        let stdout_reader = spawn_pipe_reader(child.stdout.take());
        let stderr_reader = spawn_pipe_reader(child.stderr.take());

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(xml.as_bytes()) {
                // An early renderer exit shows up as a broken pipe; the exit
                // status below is the more useful failure to report.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                other => other?,
            }
        }

        let status = wait_with_timeout(&mut child, self.timeout)?;

        let png = join_pipe_reader(stdout_reader)?;
        let diagnostics = join_pipe_reader(stderr_reader).unwrap_or_default();

        if !status.success() {
            return Err(Error::RendererExit {
                code: status.code(),
                stderr: String::from_utf8_lossy(&diagnostics).trim().to_string(),
            });
        }

        tracing::debug!(bytes = png.len(), "renderer produced image");
        Ok(png)
    }
}

/// Format PNG bytes as a `data:` URI for direct embedding in an `img` tag.
pub fn png_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

fn spawn_pipe_reader<R>(pipe: Option<R>) -> Option<JoinHandle<std::io::Result<Vec<u8>>>>
where
    R: Read + Send + 'static,
{
    pipe.map(|mut reader| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf)?;
            Ok(buf)
        })
    })
}

fn join_pipe_reader(handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>) -> Result<Vec<u8>> {
    match handle {
        Some(handle) => {
            let bytes = handle
                .join()
                .map_err(|_| Error::Io(std::io::Error::other("pipe reader panicked")))??;
            Ok(bytes)
        }
        None => Ok(Vec::new()),
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            // Reap after the kill so no zombie is left behind.
            let _ = child.kill();
            let _ = child.wait();
            return Err(Error::RendererTimeout(timeout));
        }
        thread::sleep(EXIT_POLL_INTERVAL);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn options(language: &str, button_state: &str) -> RenderOptions {
        RenderOptions {
            language: language.to_string(),
            button_state: button_state.to_string(),
        }
    }

    #[test]
    fn args_carry_preferences_and_trailing_separator() {
        let renderer = XmlToPngRenderer::new("XMLToPng", "/skins/base");
        let args = renderer.args(&options("lang_en.xml", "hover"));

        assert_eq!(args[0], "--button_state=hover");
        assert_eq!(args[1], "--language=lang_en.xml");
        assert_eq!(args[2], format!("--skin_path=/skins/base{MAIN_SEPARATOR}"));
    }

    #[test]
    fn existing_trailing_separator_is_not_doubled() {
        let dir = format!("/skins/base{MAIN_SEPARATOR}");
        let renderer = XmlToPngRenderer::new("XMLToPng", &dir);
        let args = renderer.args(&RenderOptions::default());

        assert_eq!(args[2], format!("--skin_path={dir}"));
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let renderer = XmlToPngRenderer::new("/nonexistent/XMLToPng", ".");
        let err = renderer
            .render("<Window/>", &RenderOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::RendererSpawn { .. }));
    }

    #[test]
    fn data_uri_has_png_prefix_and_base64_payload() {
        let uri = png_data_uri(b"fake png bytes");
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(uri, "data:image/png;base64,ZmFrZSBwbmcgYnl0ZXM=");
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        fn fake_renderer(dir: &Path, script: &str) -> PathBuf {
            let path = dir.join("XMLToPng");
            fs::write(&path, format!("#!/bin/sh\n{script}\n")).expect("write script");
            let mut perms = fs::metadata(&path).expect("metadata").permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&path, perms).expect("chmod");
            path
        }

        #[test]
        fn stdout_bytes_are_returned_on_success() {
            let dir = tempfile::tempdir().expect("tempdir");
            let script = fake_renderer(dir.path(), "cat >/dev/null; printf 'PNGDATA'");
            let renderer = XmlToPngRenderer::new(script, dir.path());

            let bytes = renderer
                .render("<Window/>", &RenderOptions::default())
                .expect("fake renderer succeeds");
            assert_eq!(bytes, b"PNGDATA");
        }

        #[test]
        fn nonzero_exit_surfaces_stderr() {
            let dir = tempfile::tempdir().expect("tempdir");
            let script = fake_renderer(
                dir.path(),
                "cat >/dev/null; echo 'missing style.xml' >&2; exit 3",
            );
            let renderer = XmlToPngRenderer::new(script, dir.path());

            let err = renderer
                .render("<Window/>", &RenderOptions::default())
                .unwrap_err();
            match err {
                Error::RendererExit { code, stderr } => {
                    assert_eq!(code, Some(3));
                    assert_eq!(stderr, "missing style.xml");
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn hung_renderer_is_killed_at_the_timeout() {
            let dir = tempfile::tempdir().expect("tempdir");
            let script = fake_renderer(dir.path(), "cat >/dev/null; sleep 30");
            let renderer = XmlToPngRenderer::new(script, dir.path())
                .with_timeout(Duration::from_millis(200));

            let start = Instant::now();
            let err = renderer
                .render("<Window/>", &RenderOptions::default())
                .unwrap_err();
            assert!(matches!(err, Error::RendererTimeout(_)));
            assert!(start.elapsed() < Duration::from_secs(5));
        }
    }
}
