// ABOUTME: Re-exports command modules for nutristrong-cli
// ABOUTME: Provides the draft management and plan generation commands

pub mod draft;
pub mod generate;
