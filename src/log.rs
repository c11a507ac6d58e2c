//! Console status lines. Every line starts with a bold colored label so the
//! output stays scannable while `npm` is printing in between.

#[doc(hidden)]
#[macro_export]
macro_rules! __labeled {
    ($print:ident, $stream:ident, $label:literal, $style:expr, $($arg:tt)+) => {
        {
            use owo_colors::OwoColorize;

            $print!(
                "{}: {}",
                $label.if_supports_color(owo_colors::Stream::$stream, |s| s.style($style)),
                format_args!($($arg)+)
            );
        }
    };
}

#[macro_export]
macro_rules! error {
    ($single:ident) => {
        $crate::__labeled!(
            eprintln,
            Stderr,
            "error",
            owo_colors::Style::new().bold().red(),
            "{}",
            $single
        )
    };
    ($($arg:tt)+) => {
        $crate::__labeled!(eprintln, Stderr, "error", owo_colors::Style::new().bold().red(), $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::__labeled!(println, Stdout, "info", owo_colors::Style::new().bold().green(), $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($single:ident) => {
        $crate::__labeled!(
            println,
            Stdout,
            "warning",
            owo_colors::Style::new().bold().yellow(),
            "{}",
            $single
        )
    };
    ($($arg:tt)+) => {
        $crate::__labeled!(println, Stdout, "warning", owo_colors::Style::new().bold().yellow(), $($arg)+)
    };
}

/// An action `--dry-run` skipped.
#[macro_export]
macro_rules! plan {
    ($($arg:tt)+) => {
        $crate::__labeled!(println, Stdout, "dry-run", owo_colors::Style::new().bold().cyan(), $($arg)+)
    };
}

/// Only printed when `QA_GEN_TRACE` is set.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => {
        if std::env::var_os("QA_GEN_TRACE").is_some() {
            $crate::__labeled!(println, Stdout, "trace", owo_colors::Style::new().bold(), $($arg)+)
        }
    };
}
