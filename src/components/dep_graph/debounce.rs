/// Coalesces bursts of events. Each event takes a ticket and arms a timer;
/// only the timer holding the newest ticket is allowed to fire.
#[derive(Clone, Copy, Debug, Default)]
pub struct Debouncer {
	latest: u64,
	fired: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

impl Debouncer {
	pub fn schedule(&mut self) -> Ticket {
		self.latest += 1;
		self.fired = false;
		Ticket(self.latest)
	}

	/// True exactly once, for the most recent ticket.
	pub fn fire(&mut self, ticket: Ticket) -> bool {
		if ticket.0 != self.latest || self.fired {
			return false;
		}
		self.fired = true;
		true
	}
}
