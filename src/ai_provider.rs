use clap::ValueEnum;

/// 検出・チャットに使うAI CLIプロバイダ
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum AiProvider {
    Claude,
    Codex,
    Gemini,
}

impl AiProvider {
    pub fn command_name(&self) -> &'static str {
        match self {
            AiProvider::Claude => "claude",
            AiProvider::Codex => "codex",
            AiProvider::Gemini => "gemini",
        }
    }

    /// ワンショット実行の引数列を組み立てる
    pub fn one_shot_args<'a>(&self, prompt: &'a str) -> Vec<&'a str> {
        match self {
            AiProvider::Claude => vec!["-p", prompt, "--output-format", "text"],
            AiProvider::Codex => vec!["exec", prompt],
            AiProvider::Gemini => vec!["-p", prompt],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names() {
        assert_eq!(AiProvider::Claude.command_name(), "claude");
        assert_eq!(AiProvider::Codex.command_name(), "codex");
        assert_eq!(AiProvider::Gemini.command_name(), "gemini");
    }

    #[test]
    fn test_one_shot_args_include_prompt() {
        let args = AiProvider::Claude.one_shot_args("analyze this");
        assert!(args.contains(&"analyze this"));
        assert_eq!(args[0], "-p");
    }
}
