//! Assertion primitives for test suites
//!
//! Each check returns [`Error::Assertion`] on failure, so a suite driver can
//! stop with `?` and report the diagnostic through [`crate::report::finish`].
//!
//! ```ignore
//! let user: User = Call::get("/users/1").send(&ctx, &mut dc).await?;
//! assert_equal("John", user.name.as_str())?;
//! assert_id(user.id.as_deref())?;
//! ```

use std::fmt::Debug;

use crate::error::{Error, Result};

/// Length of a textual UUID
const ID_LEN: usize = 36;

pub fn assert_equal<T: PartialEq + Debug>(expected: T, actual: T) -> Result<()> {
    if expected != actual {
        return Err(Error::assertion(expected, actual));
    }
    Ok(())
}

pub fn assert_true(actual: bool) -> Result<()> {
    assert_equal(true, actual)
}

pub fn assert_false(actual: bool) -> Result<()> {
    assert_equal(false, actual)
}

pub fn assert_none<T: Debug>(actual: &Option<T>) -> Result<()> {
    if actual.is_some() {
        return Err(Error::assertion(None::<()>, actual));
    }
    Ok(())
}

pub fn assert_some<T: Debug>(actual: &Option<T>) -> Result<()> {
    if actual.is_none() {
        return Err(Error::Assertion {
            expected: String::from("Some(_)"),
            actual: String::from("None"),
        });
    }
    Ok(())
}

/// Checks that an operation did not fail
pub fn assert_ok<T, E: Debug>(actual: &std::result::Result<T, E>) -> Result<()> {
    match actual {
        Ok(_) => Ok(()),
        Err(err) => Err(Error::Assertion {
            expected: String::from("Ok(_)"),
            actual: format!("Err({:?})", err),
        }),
    }
}

/// Checks that an identifier is present and has the length of a UUID
pub fn assert_id(actual: Option<&str>) -> Result<()> {
    assert_some(&actual)?;
    assert_equal(ID_LEN, actual.map(str::len).unwrap_or_default())
}
