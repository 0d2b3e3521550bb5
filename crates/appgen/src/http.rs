/// Read a response body chunk by chunk until the transport reports the end.
///
/// Bytes are joined before decoding so a multi-byte character split across
/// chunks survives; invalid UTF-8 is replaced rather than rejected.
pub async fn read_chunks(mut response: reqwest::Response) -> reqwest::Result<String> {
    let mut buf = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        buf.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
