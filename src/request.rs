pub mod method;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

use self::method::Method;

/// Upper bound on an accepted request body; thoughts are at most 140 characters.
pub const MAX_BODY_LEN: usize = 64 * 1024;

/// Upper bound on the request line plus all headers, matching Node's default.
pub const MAX_HEAD_LEN: usize = 16 * 1024;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("failed to read request: {0}")]
    Io(std::io::Error),

    #[error("request head is not valid UTF-8")]
    InvalidEncoding,

    #[error("request head exceeds {0} bytes")]
    HeadTooLarge(usize),

    #[error("connection closed before a request line was sent")]
    MissingRequestLine,

    #[error("invalid method {0:?}")]
    InvalidMethod(String),

    #[error("invalid content-length {0:?}")]
    InvalidContentLength(String),
}

impl RequestError {
    /// Whether the peer sent something we could answer with a 400.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::InvalidMethod(_)
                | Self::InvalidContentLength(_)
                | Self::InvalidEncoding
                | Self::HeadTooLarge(_)
        )
    }
}

impl From<std::io::Error> for RequestError {
    fn from(e: std::io::Error) -> Self {
        // read_line reports non UTF-8 input as InvalidData
        match e.kind() {
            std::io::ErrorKind::InvalidData => Self::InvalidEncoding,
            _ => Self::Io(e),
        }
    }
}

/// Reads one line of the request head, failing once the head as a whole grows past
/// [`MAX_HEAD_LEN`].
async fn read_head_line<R>(
    reader: &mut R,
    line: &mut String,
    head_len: &mut usize,
) -> Result<usize, RequestError>
where
    R: AsyncBufRead + Unpin,
{
    let remaining = MAX_HEAD_LEN.saturating_sub(*head_len);
    let n = (&mut *reader)
        .take(remaining as u64 + 1)
        .read_line(line)
        .await?;
    *head_len += n;
    if *head_len > MAX_HEAD_LEN {
        return Err(RequestError::HeadTooLarge(MAX_HEAD_LEN));
    }
    Ok(n)
}

#[derive(Default, Debug)]
pub struct Request {
    method: Method,
    uri: String,
    body: Option<String>,
}

impl Request {
    /// Read data from the stream and create a new HTTP `Request`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the data from the stream is invalid HTTP request.
    pub async fn from_stream<R>(stream: &mut R) -> Result<Self, RequestError>
    where
        R: AsyncRead + Unpin,
    {
        let mut buf_reader = BufReader::new(stream);
        let mut head_len = 0;

        // read status line
        let mut status_line = String::with_capacity(512);
        if read_head_line(&mut buf_reader, &mut status_line, &mut head_len).await? == 0 {
            return Err(RequestError::MissingRequestLine);
        }
        let status_line = status_line.trim_end();

        let mut request = Self::default();

        // extract method and uri
        let mut status_line_iter = status_line.split_whitespace();
        let method = status_line_iter.next().unwrap_or("");
        request.set_method(method)?;
        let uri = status_line_iter.next().unwrap_or("/").to_string();
        request.set_uri(uri);

        // read through header section and find content-length if any
        let mut content_length = None;
        let mut header_line = String::with_capacity(512);
        loop {
            if read_head_line(&mut buf_reader, &mut header_line, &mut head_len).await? == 0 {
                // peer closed mid-headers; treat what we have as the whole request
                break;
            }
            let trimmed = header_line.trim_end();

            match trimmed {
                // end of header section
                "" => break,
                // find content-length
                l if content_length.is_none() => {
                    let mut header_line_iter = l.splitn(2, ':');
                    let header_name = header_line_iter.next().unwrap_or("");
                    if header_name.trim().eq_ignore_ascii_case("content-length") {
                        let header_value = header_line_iter.next().unwrap_or("").trim();
                        let len: usize = header_value.parse().map_err(|_| {
                            RequestError::InvalidContentLength(header_value.to_string())
                        })?;
                        if len > MAX_BODY_LEN {
                            return Err(RequestError::InvalidContentLength(
                                header_value.to_string(),
                            ));
                        }
                        content_length = Some(len);
                    }
                }
                _ => (),
            }

            // stream's read_line() will append a newline to the end of the line
            // we need an empty string to read the next line
            header_line.clear();
        }

        // read body if any
        if let Some(len) = content_length.filter(|len| *len > 0) {
            let mut body = vec![0; len];
            buf_reader.read_exact(&mut body).await?;
            let body = String::from_utf8_lossy(&body).to_string();
            request.set_body(Some(body));
        }

        Ok(request)
    }

    pub fn uri(&self) -> &str {
        self.uri.as_ref()
    }

    /// The uri without its query string.
    pub fn path(&self) -> &str {
        match self.uri.split_once('?') {
            Some((path, _)) => path,
            None => &self.uri,
        }
    }

    pub fn set_uri(&mut self, uri: String) {
        self.uri = uri;
    }

    pub fn body(&self) -> Option<&String> {
        self.body.as_ref()
    }

    pub fn set_body(&mut self, body: Option<String>) {
        self.body = body;
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Sets the method of this [`Request`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the method is not one we recognise.
    pub fn set_method(&mut self, method: &str) -> Result<(), RequestError> {
        self.method = method
            .parse()
            .map_err(|_| RequestError::InvalidMethod(method.to_string()))?;
        Ok(())
    }
}
