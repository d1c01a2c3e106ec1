//! Executable resolution, command-line synthesis and subprocess execution.

mod command;
mod locate;
mod probe;
mod runner;

pub use command::{
    CommandSpec, CompatMode, JlinkOptions, LaunchOptions, build_jlink_args, build_launch_args,
    qualify_main_class,
};
pub use locate::ExecutableResolver;
pub use probe::{is_java8_target, jlink_major_version};
pub use runner::{OutputSink, ProcessRunner};
