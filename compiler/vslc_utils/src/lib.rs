// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

/// Reports an internal compiler error and aborts the compilation.
///
/// Only for states an earlier pass should have made impossible; user
/// errors travel through the pass error types instead.
#[macro_export]
macro_rules! bug {
    ($($arg:tt)*) => ({
        eprintln!("VSLC internal error: {}! Aborting...", format!($($arg)*));
        std::process::exit(1);
    });
}
