use std::process::{
    Command,
    Stdio,
};

use super::{
    SpeechEngine,
    Voice,
};
use crate::core::WordflashError;

const SAY_BIN: &str = "say";

/// The macOS `say` command. Speech runs as a detached child process so the
/// card timer never waits on it.
pub struct SayEngine {
    voices: Vec<Voice>,
}

impl SayEngine {
    /// Returns `None` when `say` is missing or lists no voices.
    pub fn detect() -> Option<Self> {
        let output = Command::new(SAY_BIN).args(["-v", "?"]).stderr(Stdio::null()).output().ok()?;
        if !output.status.success() {
            return None;
        }

        let voices = parse_voice_list(&String::from_utf8_lossy(&output.stdout));
        if voices.is_empty() {
            return None;
        }

        Some(Self { voices })
    }
}

impl SpeechEngine for SayEngine {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn speak(&mut self, text: &str, voice: &Voice) -> Result<(), WordflashError> {
        Command::new(SAY_BIN)
            .arg("-v")
            .arg(&voice.name)
            .arg("--")
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(())
    }
}

/// Parses `say -v ?` output, one voice per line:
/// `Samantha            en_US    # Hello! My name is Samantha.`
/// Names may contain spaces, so the locale is the last token before `#`.
pub fn parse_voice_list(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter_map(|line| {
            let entry = line.split('#').next()?.trim_end();
            let (name, lang) = entry.rsplit_once(char::is_whitespace)?;
            let name = name.trim();
            if name.is_empty() || !lang.contains(['_', '-']) {
                return None;
            }
            Some(Voice::new(name, lang))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_voice_list() {
        let output = "\
Alex                en_US    # Most people recognize me by my voice.
Bad News            en_US    # The light you see at the end of the tunnel.
Yuna                ko_KR    # 안녕하세요. 제 이름은 유나입니다.
garbage line
";
        let voices = parse_voice_list(output);
        assert_eq!(
            voices,
            vec![
                Voice::new("Alex", "en-US"),
                Voice::new("Bad News", "en-US"),
                Voice::new("Yuna", "ko-KR"),
            ]
        );
    }
}
