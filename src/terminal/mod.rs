//! Keeps keystrokes from being echoed over the progress bars while a run is
//! on screen. The terminal mode is restored when the guard is dropped.

#[cfg(unix)]
mod imp {
    use std::{io, mem::MaybeUninit, os::fd::RawFd};

    use tracing::{debug, warn};

    pub struct EchoGuard {
        fd: RawFd,
        original: libc::termios,
    }

    impl EchoGuard {
        /// Turns echo off on `fd`. Returns `None` if `fd` is not a terminal.
        pub fn acquire(fd: RawFd) -> io::Result<Option<Self>> {
            if unsafe { libc::isatty(fd) } != 1 {
                return Ok(None);
            }

            let mut mode = MaybeUninit::<libc::termios>::uninit();
            if unsafe { libc::tcgetattr(fd, mode.as_mut_ptr()) } != 0 {
                return Err(io::Error::last_os_error());
            }
            let original = unsafe { mode.assume_init() };

            let mut silent = original;
            silent.c_lflag &= !libc::ECHO;
            if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &silent) } != 0 {
                return Err(io::Error::last_os_error());
            }
            debug!("Terminal echo disabled on fd {}", fd);
            Ok(Some(Self { fd, original }))
        }

        pub fn stdin() -> io::Result<Option<Self>> {
            Self::acquire(libc::STDIN_FILENO)
        }
    }

    impl Drop for EchoGuard {
        fn drop(&mut self) {
            if unsafe { libc::tcsetattr(self.fd, libc::TCSAFLUSH, &self.original) } != 0 {
                warn!(
                    "Failed to restore terminal mode on fd {}: {}",
                    self.fd,
                    io::Error::last_os_error()
                );
            } else {
                debug!("Terminal echo restored on fd {}", self.fd);
            }
        }
    }
}

#[cfg(not(unix))]
mod imp {
    use std::io;

    pub struct EchoGuard;

    impl EchoGuard {
        pub fn stdin() -> io::Result<Option<Self>> {
            Ok(None)
        }
    }
}

pub use imp::EchoGuard;

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::fd::AsRawFd;

    #[test]
    fn test_regular_file_is_not_a_terminal() {
        let file = tempfile::tempfile().unwrap();
        let guard = EchoGuard::acquire(file.as_raw_fd()).unwrap();
        assert!(guard.is_none());
    }
}
