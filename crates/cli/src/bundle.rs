//! Skills, agents and commands compiled into the binary.

use {
    include_dir::{Dir, include_dir},
    skillport_skills::EmbeddedSource,
};

static BUNDLE: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/bundle");

pub fn source() -> EmbeddedSource {
    EmbeddedSource::new(&BUNDLE)
}
