use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::env;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;

use crate::output::{NarrationHandle, NarrationStatus, Narrator};

// Candidate programs in order of preference, with the arguments selecting a
// Mandarin voice where the program needs one.
const KNOWN_ENGINES: [(&str, &[&str]); 3] = [
    ("say", &[]),
    ("espeak-ng", &["-v", "cmn"]),
    ("espeak", &["-v", "zh"]),
];

/// A speech program invoked as `program [args..] <text>`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Engine {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Engine {
    pub fn new(program: PathBuf) -> Self {
        let args = program
            .file_name()
            .and_then(|name| KNOWN_ENGINES.iter().find(|(known, _)| *known == name))
            .map(|(_, args)| args.iter().map(|a| (*a).to_owned()).collect())
            .unwrap_or_default();
        Engine { program, args }
    }

    /// First known speech program found on `PATH`.
    pub fn detect() -> Option<Engine> {
        let path = env::var_os("PATH")?;
        let engine = KNOWN_ENGINES.iter().find_map(|(name, _)| {
            env::split_paths(&path)
                .map(|dir| dir.join(name))
                .find(|candidate| is_executable(candidate))
        });
        engine.map(Engine::new)
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}

pub struct SpeechNarration {
    child: Arc<Mutex<Child>>,
}

impl NarrationHandle for SpeechNarration {
    fn status(&self) -> NarrationStatus {
        match self.child.lock().try_wait() {
            Ok(None) => NarrationStatus::Speaking,
            Ok(Some(exit_status)) if exit_status.success() => NarrationStatus::Finished,
            Ok(Some(exit_status)) => {
                log::warn!("Speech engine exited with {}", exit_status);
                NarrationStatus::Failed
            }
            Err(e) => {
                log::warn!("Could not poll speech engine: {}", e);
                NarrationStatus::Failed
            }
        }
    }
}

/// Narrates by running an external speech program, one process per utterance.
pub struct SpeechNarrator {
    engine: Option<Engine>,
    current: Mutex<Option<Arc<Mutex<Child>>>>,
}

impl SpeechNarrator {
    pub fn new(engine: Option<Engine>) -> Self {
        match &engine {
            Some(engine) => log::info!("Using speech engine {:?}", engine.program),
            None => log::info!("No speech engine, narration is disabled"),
        }
        SpeechNarrator {
            engine,
            current: Mutex::new(None),
        }
    }
}

impl Narrator for SpeechNarrator {
    type Handle = SpeechNarration;

    fn is_available(&self) -> bool {
        self.engine.is_some()
    }

    fn speak(&self, text: &str) -> Result<SpeechNarration> {
        let engine = self.engine.as_ref().context("No speech engine")?;
        self.stop()?;
        let child = Command::new(&engine.program)
            .args(&engine.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Could not spawn speech engine {:?}", engine.program))?;
        let child = Arc::new(Mutex::new(child));
        *self.current.lock() = Some(child.clone());
        Ok(SpeechNarration { child })
    }

    fn stop(&self) -> Result<()> {
        if let Some(child) = self.current.lock().take() {
            let mut child = child.lock();
            if child.try_wait()?.is_none() {
                child.kill().context("Could not stop speech engine")?;
                child.wait()?;
            }
        }
        Ok(())
    }
}

impl Drop for SpeechNarrator {
    fn drop(&mut self) {
        self.stop().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_engine_gets_voice_arguments() {
        let engine = Engine::new(PathBuf::from("/usr/bin/espeak-ng"));
        assert_eq!(engine.args, vec!["-v".to_owned(), "cmn".to_owned()]);
    }

    #[test]
    fn unknown_engine_gets_no_arguments() {
        let engine = Engine::new(PathBuf::from("/opt/tts/speak"));
        assert!(engine.args.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn detection_requires_execute_permission() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let program = dir.path().join("espeak");
        fs::write(&program, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&program, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!is_executable(&program));

        fs::set_permissions(&program, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(is_executable(&program));
        assert!(!is_executable(dir.path()));
    }

    #[test]
    fn without_engine_narration_is_unavailable() {
        let narrator = SpeechNarrator::new(None);
        assert!(!narrator.is_available());
        assert!(narrator.speak("题目").is_err());
        assert!(narrator.stop().is_ok());
    }
}
