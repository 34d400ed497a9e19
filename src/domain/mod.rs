// ============================================================
// Layer 3 — Domain Types
// ============================================================
// Plain data records shared by every layer: the pre-encoded answer
// pool entry and the labeled (question, answer) training example.
// No I/O, no feature logic — those live in Layer 4.

pub mod example;
