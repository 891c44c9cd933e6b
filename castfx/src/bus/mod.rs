pub use captions::*;
pub use errors::*;
pub use media::*;
pub use message::*;
pub use surface::*;

mod captions;
mod errors;
mod media;
mod message;
mod surface;

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use async_trait::async_trait;
    use mockall::mock;
    use std::fmt::{Display, Formatter};

    mock! {
        #[derive(Debug)]
        pub MessageHandler {}

        #[async_trait]
        impl MessageHandler for MessageHandler {
            fn is_supported(&self, namespace: &str) -> bool;
            async fn process(&self, message: BusMessage) -> Result<()>;
        }
    }

    impl Display for MockMessageHandler {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "MockMessageHandler")
        }
    }
}
