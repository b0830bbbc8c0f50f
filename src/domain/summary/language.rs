/// Spoken name for a code fence language tag.
///
/// Unknown tags are spoken as written; an empty tag becomes "code".
pub fn display_name(tag: &str) -> String {
    let name = match tag.trim().to_lowercase().as_str() {
        "python" | "py" => "Python",
        "javascript" | "js" | "jsx" => "JavaScript",
        "typescript" | "ts" | "tsx" => "TypeScript",
        "bash" => "Bash",
        "sh" | "shell" | "zsh" => "shell",
        "sql" => "SQL",
        "json" => "JSON",
        "html" => "HTML",
        "css" => "CSS",
        "yaml" | "yml" => "YAML",
        "markdown" | "md" => "Markdown",
        "rust" | "rs" => "Rust",
        "go" | "golang" => "Go",
        "git" => "Git",
        "" => "code",
        _ => return tag.trim().to_string(),
    };

    name.to_string()
}
