//! Database integration tests.

use super::*;
use crate::error::AppError;
use crate::id::ObjectId;
use crate::models::{folder::*, note::*, tag::*, NamedRecord};
use crate::query::NoteFilter;
use crate::test_support::{insert_note, setup_temp_db};

mod basic_ops;
