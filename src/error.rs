/// Errors that can occur while acquiring the audio output capability.
///
/// None of these reach the callers of the tone engine: `ToneEngine::initialize`
/// logs them and leaves the engine silent.
#[derive(Debug)]
pub enum AudioError {
    /// The platform has no output device
    NoOutputDevice,
    /// The device offered no usable stream configuration
    UnsupportedConfig(String),
    /// Building or starting the output stream failed
    Stream(String),
    /// Audio was turned off by the host
    Disabled,
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::NoOutputDevice => write!(f, "no default output device available"),
            AudioError::UnsupportedConfig(reason) => {
                write!(f, "unsupported output config: {}", reason)
            }
            AudioError::Stream(reason) => write!(f, "output stream failed: {}", reason),
            AudioError::Disabled => write!(f, "audio output disabled"),
        }
    }
}

impl std::error::Error for AudioError {}
