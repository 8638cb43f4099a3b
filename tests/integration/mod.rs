//! Integration tests driving the compiled binary against scratch repositories

mod helpers;

#[cfg(unix)]
mod test_doctor;
#[cfg(unix)]
mod test_init;
#[cfg(unix)]
mod test_publish;
#[cfg(unix)]
mod test_restore;
