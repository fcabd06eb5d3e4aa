use crate::commands::{CmdMessage, CmdResult};
use crate::store::backend::StorageBackend;
use crate::store::HistoryStore;
use crate::validity::FsProbe;

pub fn run<B, P>(store: &HistoryStore<B>, probe: &P, only_invalid: bool) -> CmdResult
where
    B: StorageBackend,
    P: FsProbe + ?Sized,
{
    let entries = store.all_with_status(probe);
    let total = entries.len();
    let listed: Vec<_> = if only_invalid {
        entries
            .into_iter()
            .filter(|entry| !entry.status.is_valid())
            .collect()
    } else {
        entries
    };

    let mut result = CmdResult::default();
    if total == 0 {
        result.add_message(CmdMessage::info("No history found."));
    } else if only_invalid && listed.is_empty() {
        result.add_message(CmdMessage::success(format!(
            "All {} link(s) are valid.",
            total
        )));
    }
    if store.is_dirty() {
        result.add_message(CmdMessage::warning(
            "History has unsaved changes; the file on disk is out of date.",
        ));
    }
    result.with_listed(listed)
}
