use crate::bus::{
    CaptionMessageHandler, MediaMessageHandler, MessageBusProcessor, MessageHandler,
    SurfaceMessageHandler,
};
use crate::console::{ConsoleShell, ConsoleSurface};

use castfx_core::core::config::ReceiverProperties;
use castfx_core::core::players::CastPlayer;
use log::info;
use std::io;
use std::sync::Arc;
use tokio::io::AsyncBufRead;
use tokio::select;

/// Start a receiver session which processes the cast bus messages of the given reader.
/// This future keeps running until the input ends, the session is closed or the host is terminated.
pub async fn start<R>(reader: R, properties: ReceiverProperties) -> io::Result<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let surface = Arc::new(ConsoleSurface::new());
    let shell = Arc::new(ConsoleShell::new());
    let player = Arc::new(CastPlayer::new(
        surface.clone(),
        shell.clone(),
        properties,
    ));

    let handlers: Vec<Box<dyn MessageHandler>> = vec![
        Box::new(MediaMessageHandler::new(player.clone())),
        Box::new(CaptionMessageHandler::new(player.clone())),
        Box::new(SurfaceMessageHandler::new(surface.clone())),
    ];
    let processor = MessageBusProcessor::new(reader, handlers);
    info!("Receiver session has been started");

    select! {
        _ = tokio::signal::ctrl_c() => processor.stop(),
        _ = processor.stopped() => (),
        _ = shell.closed() => processor.stop(),
    }

    info!(
        "Receiver session has ended in state {} (closed: {}, source: {:?}, shell: {})",
        player.state().await,
        shell.is_closed(),
        surface.video_source(),
        shell.marker()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::bus::MEDIA_NAMESPACE;

    use castfx_core::core::players::IdleTimeouts;
    use castfx_core::init_logger;
    use std::time::Duration;
    use tokio::io::{AsyncWriteExt, BufReader};
    use tokio::time;

    #[tokio::test]
    async fn test_start_ends_with_input() {
        init_logger!();
        let input = format!(
            "{}\n{}\n",
            r#"{"namespace": "urn:x-cast:com.google.cast.media", "data": {"type": "LOAD", "media": {"contentId": "http://localhost/movie.mp4", "contentType": "video/mp4"}}}"#,
            r#"{"namespace": "urn:x-cast:com.koushikdutta.cast", "data": "{}"}"#,
        );

        let result = time::timeout(
            Duration::from_millis(500),
            start(io::Cursor::new(input.into_bytes()), ReceiverProperties::default()),
        )
        .await
        .expect("expected the session to end with the input");

        assert!(result.is_ok(), "expected Ok, got {:?} instead", result);
    }

    #[tokio::test]
    async fn test_start_ends_with_session_close() {
        init_logger!();
        let (mut writer, reader) = tokio::io::duplex(1024);
        let properties = ReceiverProperties {
            idle_timeouts: IdleTimeouts {
                launching: Some(Duration::from_millis(50)),
                idle: Some(Duration::from_millis(50)),
                ..Default::default()
            },
            crossfade: Duration::from_millis(10),
            ..Default::default()
        };

        let session = tokio::spawn(start(BufReader::new(reader), properties));
        writer
            .write_all(format!("{{\"namespace\": \"{}\", \"data\": {{\"type\": \"PAUSE\"}}}}\n", MEDIA_NAMESPACE).as_bytes())
            .await
            .unwrap();

        let result = time::timeout(Duration::from_secs(2), session)
            .await
            .expect("expected the session to be closed after idling")
            .unwrap();
        assert!(result.is_ok(), "expected Ok, got {:?} instead", result);
    }
}
