// ABOUTME: Helper modules for nutristrong-cli
// ABOUTME: Output formatting shared by the draft and generate commands

pub mod display;
