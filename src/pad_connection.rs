use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use futures::Stream;
use log::debug;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::pad_error::PadError;
use crate::pad_links::{find_link_in_line, title_from_line};
use crate::pad_sections::{PadSections, SectionSplitter};
use crate::pad_source::PadSource;

/// Lines of a response body, decoded as the chunks arrive.
pub struct LineStream {
    body: BoxStream<'static, Result<Bytes, PadError>>,
    buf: BytesMut,
    scanned: usize,
    done: bool,
}

impl LineStream {
    pub fn new<S>(body: S) -> Self
    where
        S: Stream<Item = Result<Bytes, PadError>> + Send + 'static,
    {
        Self {
            body: body.boxed(),
            buf: BytesMut::new(),
            scanned: 0,
            done: false,
        }
    }

    pub fn from_response(resp: reqwest::Response) -> Self {
        Self::new(resp.bytes_stream().map_err(PadError::from))
    }

    /// Next line without its `\n` or `\r\n` terminator, `None` at end of body.
    pub async fn next_line(&mut self) -> Result<Option<String>, PadError> {
        loop {
            if let Some(idx) = self.buf[self.scanned..].iter().position(|b| *b == b'\n') {
                let line = self.buf.split_to(self.scanned + idx + 1);
                self.scanned = 0;
                return Ok(Some(decode_line(&line)));
            }
            self.scanned = self.buf.len();
            if self.done {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                let line = self.buf.split();
                self.scanned = 0;
                return Ok(Some(decode_line(&line)));
            }
            match self.body.next().await {
                Some(chunk) => self.buf.extend_from_slice(&chunk?),
                None => self.done = true,
            }
        }
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

pub struct PadConnection {
    client: Client,
}

impl PadConnection {
    /// Without a timeout every request blocks until the server answers.
    pub fn new(timeout: Option<Duration>) -> Result<Self, PadError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Raw markdown endpoint of a pad.
    pub fn download_url(pad_url: &str) -> String {
        let pad_url = pad_url.strip_suffix('/').unwrap_or(pad_url);
        format!("{}/download", pad_url)
    }

    pub async fn get_lines(&self, url: &str) -> Result<LineStream, PadError> {
        debug!("GET {}", url);
        let resp = self.client.get(url).send().await?;
        if resp.status() != StatusCode::OK {
            return Err(PadError::Status {
                url: url.to_string(),
                status: resp.status(),
            });
        }
        Ok(LineStream::from_response(resp))
    }

    pub async fn get_pad(&self, pad_url: &str) -> Result<LineStream, PadError> {
        self.get_lines(&Self::download_url(pad_url)).await
    }
}

/// First link below `prefix`, reading no further than the line that holds it.
pub async fn first_link_in(lines: &mut LineStream, prefix: &str) -> Result<Option<String>, PadError> {
    while let Some(line) = lines.next_line().await? {
        if let Some(link) = find_link_in_line(&line, prefix) {
            return Ok(Some(link));
        }
    }
    Ok(None)
}

pub async fn sections_from(lines: &mut LineStream) -> Result<PadSections, PadError> {
    let mut splitter = SectionSplitter::new();
    while let Some(line) = lines.next_line().await? {
        splitter.push_line(&line);
    }
    Ok(splitter.finish())
}

/// Text of the first `<title>` line, `url` when there is none.
pub async fn title_from(lines: &mut LineStream, url: &str) -> Result<String, PadError> {
    while let Some(line) = lines.next_line().await? {
        if let Some(title) = title_from_line(&line) {
            return Ok(title);
        }
    }
    Ok(url.to_string())
}

#[async_trait]
impl PadSource for PadConnection {
    async fn first_link(&self, index_url: &str, prefix: &str) -> Result<Option<String>, PadError> {
        first_link_in(&mut self.get_pad(index_url).await?, prefix).await
    }

    async fn pad_sections(&self, pad_url: &str) -> Result<PadSections, PadError> {
        sections_from(&mut self.get_pad(pad_url).await?).await
    }

    async fn page_title(&self, url: &str) -> Result<String, PadError> {
        title_from(&mut self.get_lines(url).await?, url).await
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use futures::stream;
    use reqwest::{Client, StatusCode};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use crate::episode_section::EpisodeSection;
    use crate::pad_connection::{
        first_link_in, sections_from, title_from, LineStream, PadConnection,
    };
    use crate::pad_error::{ErrorKind, PadError};
    use crate::pad_source::PadSource;

    const PREFIX: &str = "https://pad.ccc-p.org/";

    fn chunked(chunks: &[&'static str]) -> LineStream {
        let chunks: Vec<Result<Bytes, PadError>> = chunks
            .iter()
            .map(|c| Ok(Bytes::from_static(c.as_bytes())))
            .collect();
        LineStream::new(stream::iter(chunks))
    }

    async fn collect(mut lines: LineStream) -> Vec<String> {
        let mut output = Vec::new();
        while let Some(line) = lines.next_line().await.unwrap() {
            output.push(line);
        }
        output
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    /// Answer a single request on a local port with `response`, returns the base url.
    async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://127.0.0.1:{}", port)
    }

    fn local_connection() -> PadConnection {
        PadConnection::from_client(Client::builder().no_proxy().build().unwrap())
    }

    #[test]
    fn test_pad_connection_download_url() {
        assert_eq!(
            PadConnection::download_url("https://pad.ccc-p.org/Radio/"),
            "https://pad.ccc-p.org/Radio/download"
        );
        assert_eq!(
            PadConnection::download_url("https://pad.ccc-p.org/Radio"),
            "https://pad.ccc-p.org/Radio/download"
        );
    }

    #[tokio::test]
    async fn test_pad_connection_line_stream_across_chunks() {
        let lines = chunked(&["## Sum", "mary\r\nfirst ", "line\n\nlast"]);
        assert_eq!(
            collect(lines).await,
            vec!["## Summary", "first line", "", "last"]
        );
    }

    #[tokio::test]
    async fn test_pad_connection_line_stream_trailing_newline() {
        assert_eq!(collect(chunked(&["a\nb\n"])).await, vec!["a", "b"]);
        assert!(collect(chunked(&[])).await.is_empty());
    }

    #[tokio::test]
    async fn test_pad_connection_line_stream_error() {
        let chunks: Vec<Result<Bytes, PadError>> = vec![
            Ok(Bytes::from_static(b"a\npartial")),
            Err(PadError::NoEpisodeLink("x".into())),
        ];
        let mut lines = LineStream::new(stream::iter(chunks));
        assert_eq!(lines.next_line().await.unwrap(), Some("a".to_string()));
        assert!(lines.next_line().await.is_err());
    }

    #[tokio::test]
    async fn test_pad_connection_line_stream_long_line() {
        let mut chunks = vec!["<html>"; 2000];
        chunks.push("\n<title>x</title>");
        let lines = collect(chunked(&chunks)).await;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 6 * 2000);
        assert_eq!(lines[1], "<title>x</title>");
    }

    #[tokio::test]
    async fn test_pad_connection_first_link_in_stops_at_match() {
        let chunks: Vec<Result<Bytes, PadError>> = vec![
            Ok(Bytes::from_static(b"# Radio\n* [next](https://pad.ccc-p.org/")),
            Ok(Bytes::from_static(b"CiR_2023-05-10_x)\n")),
            Err(PadError::NoEpisodeLink("unread".into())),
        ];
        let mut lines = LineStream::new(stream::iter(chunks));
        assert_eq!(
            first_link_in(&mut lines, PREFIX).await.unwrap(),
            Some("https://pad.ccc-p.org/CiR_2023-05-10_x".to_string())
        );

        let mut lines = chunked(&["# Radio\n", "(https://pad.ccc-p.org/open\n"]);
        assert_eq!(first_link_in(&mut lines, PREFIX).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_pad_connection_sections_from() {
        let mut lines = chunked(&["## Summary\r\n  hi \r", "\n## Chap", "ters\r\n00:00:00 Intro"]);
        let sections = sections_from(&mut lines).await.unwrap();
        assert_eq!(sections.section(EpisodeSection::Summary).unwrap(), &["hi"]);
        assert_eq!(
            sections.section(EpisodeSection::Chapters).unwrap(),
            &["00:00:00 Intro"]
        );
    }

    #[tokio::test]
    async fn test_pad_connection_title_from() {
        let mut lines = chunked(&["<html>\r\n<he", "ad>\r\n<title>Song | FMA</title>\r\n"]);
        assert_eq!(
            title_from(&mut lines, "https://x").await.unwrap(),
            "Song | FMA"
        );

        let mut lines = chunked(&["<html><title>inline</title></html>"]);
        assert_eq!(
            title_from(&mut lines, "https://x").await.unwrap(),
            "https://x"
        );
    }

    #[tokio::test]
    async fn test_pad_connection_page_title_local() {
        let url = serve_once(http_response(
            "200 OK",
            "<html>\r\n<title>Song | FMA</title>\r\n</html>",
        ))
        .await;
        assert_eq!(local_connection().page_title(&url).await.unwrap(), "Song | FMA");

        let url = serve_once(http_response("200 OK", "<html><title>inline</title>")).await;
        assert_eq!(local_connection().page_title(&url).await.unwrap(), url);
    }

    #[tokio::test]
    async fn test_pad_connection_pad_sections_local() {
        let url = serve_once(http_response("200 OK", "## Summary\r\nhi\r\n")).await;
        let sections = local_connection().pad_sections(&url).await.unwrap();
        assert_eq!(sections.section(EpisodeSection::Summary).unwrap(), &["hi"]);
    }

    #[tokio::test]
    async fn test_pad_connection_rejects_non_200() {
        let url = serve_once(http_response("404 Not Found", "")).await;
        let err = local_connection().page_title(&url).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
        match err {
            PadError::Status { status, .. } => assert_eq!(status, StatusCode::NOT_FOUND),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    #[ignore]
    async fn test_pad_connection_first_link() {
        let conn = PadConnection::new(None).unwrap();
        let link = conn
            .first_link("https://pad.ccc-p.org/Radio", "https://pad.ccc-p.org/")
            .await
            .unwrap();
        assert!(link.unwrap().starts_with("https://pad.ccc-p.org/"));
    }
}
