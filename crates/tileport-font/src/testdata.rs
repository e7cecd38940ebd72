/// DejaVu Sans Mono, see `tests/data/LICENSE-DejaVu.txt`.
pub(crate) const DEJAVU_MONO: &[u8] = include_bytes!("../tests/data/DejaVuSansMono.ttf");
