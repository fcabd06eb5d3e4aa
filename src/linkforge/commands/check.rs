use crate::commands::CmdResult;
use crate::validity::{classify, FsProbe};
use std::path::Path;

pub fn run<P: FsProbe + ?Sized>(probe: &P, link: &Path, source: &Path) -> CmdResult {
    CmdResult::default().with_validity(classify(probe, link, source))
}
