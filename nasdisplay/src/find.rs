//! Panel discovery
//!
//! Tries each configured family on the serial port in turn and keeps the
//! first one that answers its probe. Enclosures without a known panel get a
//! [`NullDisplay`].

use log::{debug, info};

use crate::backend::{Lcd, NullDisplay};
use crate::config::DisplayConfig;
use crate::display::Display;
use crate::link::SerialLink;

/// Open the panel on `config.tty`, or a [`NullDisplay`] if none answers
#[cfg(feature = "native")]
pub fn find(config: &DisplayConfig) -> Box<dyn Lcd> {
    let tty = config.tty.clone();
    find_with(|| crate::native::NativeSerial::new(tty.clone()), config)
}

/// Discovery over links produced by `make_link`, one per family tried
pub fn find_with<L, F>(mut make_link: F, config: &DisplayConfig) -> Box<dyn Lcd>
where
    L: SerialLink,
    F: FnMut() -> L,
{
    for variant in config.variants() {
        let profile = variant.profile();
        match Display::connect(make_link(), profile, config.clone()) {
            Ok(display) => {
                info!("found {} display", profile.name);
                return Box::new(display);
            }
            Err(e) => debug!("no {} display: {}", profile.name, e),
        }
    }

    info!("no front-panel display found");
    Box::new(NullDisplay)
}
