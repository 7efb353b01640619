//! Round-trip tests across parser and writer
