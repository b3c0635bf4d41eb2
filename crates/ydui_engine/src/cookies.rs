use std::path::Path;

/// Reads a Netscape cookie export chosen by the user.
///
/// Invalid UTF-8 is replaced rather than rejected; the backend only needs the
/// tab-separated lines it can parse.
pub async fn read_cookie_file(path: &Path) -> Result<String, std::io::Error> {
    let bytes = tokio::fs::read(path).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
