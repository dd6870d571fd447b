use core::time::Duration;
use gloo::timers::callback::Timeout;
use whacabol_core as game;
use yew::html::Scope;

use crate::game::{GameView, Msg};

/// Browser timers that post their event back to the game view.
///
/// A [`Timeout`] clears itself when dropped, which is what cancels a round's timers.
pub(crate) struct LinkHost {
    link: Scope<GameView>,
}

impl LinkHost {
    pub(crate) fn new(link: Scope<GameView>) -> Self {
        Self { link }
    }
}

impl game::TimerHost for LinkHost {
    type Handle = Timeout;

    fn schedule(&mut self, delay: Duration, event: game::TimerEvent) -> Self::Handle {
        let link = self.link.clone();
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        log::trace!("timer in {}ms: {:?}", millis, event);
        Timeout::new(millis, move || link.send_message(Msg::Timer(event)))
    }
}
