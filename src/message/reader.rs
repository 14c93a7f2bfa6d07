//! Draining a connection into one message buffer.

use std::io::ErrorKind;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Reasons the read phase ended early.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    /// The peer sent more than the configured maximum.
    #[error("message exceeds {limit} bytes")]
    TooLarge { limit: usize },

    /// A chunk was not valid UTF-8. `offset` is the byte offset of the
    /// chunk within the stream.
    #[error("chunk at byte {offset} is not valid UTF-8: {source}")]
    Decode {
        offset: usize,
        #[source]
        source: std::str::Utf8Error,
    },
}

/// Peer-side disconnects that end the stream like a clean close.
fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::UnexpectedEof
    )
}

/// Read `stream` to end-of-stream in chunks of at most `chunk_size` bytes,
/// appending each decoded chunk to `message`.
///
/// Reading stops with `TooLarge` once the stream goes past `max_bytes`; the
/// chunk that crossed the limit is not appended.
///
/// `message` keeps everything decoded before a failure, so callers can still
/// classify a partial message.
pub async fn read_message<R>(
    stream: &mut R,
    chunk_size: usize,
    max_bytes: usize,
    message: &mut String,
) -> Result<usize, ReadError>
where
    R: AsyncRead + Unpin,
{
    let mut chunk = vec![0u8; chunk_size.max(1)];
    let mut total = 0usize;

    loop {
        let n = match stream.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if is_disconnect(e.kind()) => {
                tracing::debug!(error = %e, bytes = total, "Peer disconnected mid-read");
                break;
            }
            Err(e) => return Err(ReadError::Io(e)),
        };

        if total + n > max_bytes {
            return Err(ReadError::TooLarge { limit: max_bytes });
        }

        let text = std::str::from_utf8(&chunk[..n]).map_err(|source| ReadError::Decode {
            offset: total,
            source,
        })?;
        message.push_str(text);
        total += n;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    /// Yields the scripted results in order, then end-of-stream.
    struct Scripted(Vec<std::io::Result<Vec<u8>>>);

    impl AsyncRead for Scripted {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            if self.0.is_empty() {
                return Poll::Ready(Ok(()));
            }
            match self.0.remove(0) {
                Ok(bytes) => {
                    buf.put_slice(&bytes);
                    Poll::Ready(Ok(()))
                }
                Err(e) => Poll::Ready(Err(e)),
            }
        }
    }

    #[tokio::test]
    async fn concatenates_chunks_in_order() {
        let mut input: &[u8] = b"123\rHello\r\r";
        let mut message = String::new();
        let n = read_message(&mut input, 4, 1024, &mut message).await.unwrap();
        assert_eq!(n, 11);
        assert_eq!(message, "123\rHello\r\r");
    }

    #[tokio::test]
    async fn empty_stream_reads_nothing() {
        let mut input: &[u8] = b"";
        let mut message = String::new();
        assert_eq!(read_message(&mut input, 1024, 1024, &mut message).await.unwrap(), 0);
        assert!(message.is_empty());
    }

    #[tokio::test]
    async fn decode_failure_keeps_earlier_chunks() {
        let mut stream = Scripted(vec![Ok(b"123\r".to_vec()), Ok(vec![0xff, 0xfe])]);
        let mut message = String::new();
        let err = read_message(&mut stream, 1024, 1024, &mut message).await.unwrap_err();
        assert!(matches!(err, ReadError::Decode { offset: 4, .. }));
        assert_eq!(message, "123\r");
    }

    #[tokio::test]
    async fn multibyte_char_split_across_chunks_fails_decode() {
        let mut input: &[u8] = "é".as_bytes();
        let mut message = String::new();
        let err = read_message(&mut input, 1, 1024, &mut message).await.unwrap_err();
        assert!(matches!(err, ReadError::Decode { offset: 0, .. }));
    }

    #[tokio::test]
    async fn reset_is_end_of_stream() {
        let mut stream = Scripted(vec![
            Ok(b"123\rHel".to_vec()),
            Err(std::io::Error::from(ErrorKind::ConnectionReset)),
        ]);
        let mut message = String::new();
        assert_eq!(read_message(&mut stream, 1024, 1024, &mut message).await.unwrap(), 7);
        assert_eq!(message, "123\rHel");
    }

    #[tokio::test]
    async fn other_io_errors_surface() {
        let mut stream = Scripted(vec![Err(std::io::Error::other("boom"))]);
        let mut message = String::new();
        assert!(matches!(
            read_message(&mut stream, 1024, 1024, &mut message).await,
            Err(ReadError::Io(_))
        ));
    }

    #[tokio::test]
    async fn stops_past_the_size_limit() {
        let mut input: &[u8] = b"123\rHello\r\r";
        let mut message = String::new();
        let err = read_message(&mut input, 4, 8, &mut message).await.unwrap_err();
        assert!(matches!(err, ReadError::TooLarge { limit: 8 }));
        assert_eq!(message, "123\rHell");
    }

    #[tokio::test]
    async fn message_exactly_at_limit_is_accepted() {
        let mut input: &[u8] = b"123\rHello\r\r";
        let mut message = String::new();
        assert_eq!(read_message(&mut input, 1024, 11, &mut message).await.unwrap(), 11);
        assert_eq!(message, "123\rHello\r\r");
    }
}
