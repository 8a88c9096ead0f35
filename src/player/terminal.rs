use std::{
    io::Write,
    sync::Arc,
    time::Duration,
};

use tokio::{
    io::{
        AsyncBufRead,
        AsyncBufReadExt,
        BufReader,
    },
    sync::mpsc::UnboundedReceiver,
};

use super::{
    Player,
    Status,
    Surface,
    TimerId,
    TokioClock,
};
use crate::{
    core::{
        Deck,
        Mode,
        WordflashError,
    },
    speech::Pronouncer,
};

/// Prints every rendered card on its own line.
pub struct TerminalSurface<W: Write> {
    out: W,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn render(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
        let _ = self.out.flush();
    }
}

/// Plays `deck` in the terminal until the finish card has been shown and
/// its interval has passed. Enter toggles pause, `q` quits.
pub async fn run(
    deck: Deck,
    mode: Mode,
    interval: Duration,
    pronouncer: Pronouncer,
) -> Result<(), WordflashError> {
    let (clock, mut fired) = TokioClock::new();
    let surface = TerminalSurface::new(std::io::stdout());
    let mut player = Player::new(clock, surface, pronouncer, interval);

    player.load_deck(Arc::new(deck));
    player.start(mode)?;
    println!("(press Enter to pause or resume, q then Enter to quit)");

    drive(&mut player, &mut fired, BufReader::new(tokio::io::stdin())).await
}

/// Feeds fired timers and input lines to `player`. Once input is closed the
/// deck plays out, unless it is paused: nothing could resume it, so the loop
/// ends there.
async fn drive<S, R>(
    player: &mut Player<TokioClock, S>,
    fired: &mut UnboundedReceiver<TimerId>,
    input: R,
) -> Result<(), WordflashError>
where
    S: Surface,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut input_open = true;

    while !player.state().is_finished() {
        tokio::select! {
            Some(timer) = fired.recv() => player.fire(timer),
            line = lines.next_line(), if input_open => match line? {
                Some(line) if line.trim().eq_ignore_ascii_case("q") => {
                    log::info!("[Player] Stopped at card {}", player.state().cursor());
                    break;
                }
                Some(_) => {
                    if player.toggle_pause() == Status::Paused {
                        println!("(paused)");
                    }
                }
                None => {
                    input_open = false;
                    if player.state().status() == Status::Paused {
                        log::info!(
                            "[Player] Input closed while paused at card {}",
                            player.state().cursor()
                        );
                        break;
                    }
                }
            },
            else => break,
        }
    }

    Ok(())
}
