use ammonia;

/// Clean HTML content using the ammonia library.
///
/// Exam titles and question prompts are authored as rich text; this keeps
/// safe tags (like <b>, <p>) while stripping dangerous tags (like
/// <script>, <iframe>) and malicious attributes (like onclick) before
/// they are stored and later rendered to test takers.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
