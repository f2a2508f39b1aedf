/// Outcome of one elapsed countdown unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownStep {
    /// Another tick is showing, with this many units left.
    Tick(u8),
    Done,
}

/// Discrete countdown: `n` observable ticks, then completion. The first tick
/// is observed when the countdown starts, each later one after a unit
/// elapses. Only dropping it cancels it.
#[derive(Clone, Debug)]
pub struct Countdown {
    remaining: u8,
}

impl Countdown {
    /// Start a countdown. Returns the first tick, or `Done` for zero ticks.
    pub fn start(ticks: u8) -> (Self, CountdownStep) {
        let step = if ticks == 0 {
            CountdownStep::Done
        } else {
            CountdownStep::Tick(ticks)
        };
        (Self { remaining: ticks }, step)
    }

    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    /// One time unit has passed.
    pub fn elapse(&mut self) -> CountdownStep {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            CountdownStep::Done
        } else {
            CountdownStep::Tick(self.remaining)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_ticks_then_done() {
        let (mut countdown, first) = Countdown::start(5);
        let mut ticks = vec![first];
        loop {
            let step = countdown.elapse();
            if step == CountdownStep::Done {
                break;
            }
            ticks.push(step);
        }
        assert_eq!(
            ticks,
            vec![
                CountdownStep::Tick(5),
                CountdownStep::Tick(4),
                CountdownStep::Tick(3),
                CountdownStep::Tick(2),
                CountdownStep::Tick(1),
            ]
        );
    }

    #[test]
    fn zero_ticks_completes_at_once() {
        let (countdown, first) = Countdown::start(0);
        assert_eq!(first, CountdownStep::Done);
        assert_eq!(countdown.remaining(), 0);
    }
}
