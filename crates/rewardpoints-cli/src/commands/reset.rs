use super::{print_outcome, CmdResult, Session};

pub fn run(yes: bool) -> CmdResult {
    if !yes {
        return Err("resetting clears all points and history; pass --yes to confirm".into());
    }
    let mut session = Session::open()?;
    let now = session.now;
    let outcome = session.tracker.reset_all_at(now);
    session.save()?;
    print_outcome(&outcome, &outcome.events())
}
