use log::debug;

use super::signature::{ArrayFunction, ColumnResult, IndexedRowFunction, RowFunction};
use crate::error::Result;
use crate::storage::{Column, Table};

impl Table {
    fn bind_columns<Bound>(
        &self,
        names: &[&str],
        bind: impl FnOnce(&[&Column]) -> Result<Bound>,
    ) -> Result<Bound> {
        //! Resolve `names`, check the signature, then force the named
        //! columns so every row read afterwards is in bounds.

        let columns = self.resolve(names)?;
        let bound = bind(columns.as_slice())?;

        for column in columns.iter() {
            column.force()?;
        }

        Ok(bound)
    }

    pub fn map<Args, R, F>(
        &self,
        names: &[&str],
        function: F,
    ) -> Result<impl ExactSizeIterator<Item = R> + use<Args, R, F>>
    where
        F: RowFunction<Args, R>,
    {
        //! Evaluate `function` over the named columns, one row at a time.
        //!
        //! Returns a lazy sequence of `rows_count()` results in row order.
        //! Every call gives a fresh sequence; the function runs only as
        //! items are pulled.

        let bound = self.bind_columns(names, F::bind)?;

        Ok((0..self.rows_count()).map(move |row| function.call(&bound, row)))
    }

    pub fn mapi<Args, R, F>(
        &self,
        names: &[&str],
        function: F,
    ) -> Result<impl ExactSizeIterator<Item = R> + use<Args, R, F>>
    where
        F: IndexedRowFunction<Args, R>,
    {
        //! [`Table::map`] with the row index passed as the first argument.

        let bound = self.bind_columns(names, F::bind)?;

        Ok((0..self.rows_count()).map(move |row| function.call(&bound, row)))
    }

    pub fn filter<Args, F>(&self, names: &[&str], predicate: F) -> Result<Table>
    where
        F: RowFunction<Args, bool>,
    {
        //! Keep the rows for which `predicate` holds, in their original
        //! order. All columns are filtered, named or not; the ones not read
        //! by the predicate stay unforced.

        let bound = self.bind_columns(names, F::bind)?;
        let rows: Vec<usize> = (0..self.rows_count())
            .filter(|&row| predicate.call(&bound, row))
            .collect();

        debug!("filter kept {} of {} row(s)", rows.len(), self.rows_count());
        Ok(self.select_rows(rows))
    }

    pub fn filteri<Args, F>(&self, names: &[&str], predicate: F) -> Result<Table>
    where
        F: IndexedRowFunction<Args, bool>,
    {
        let bound = self.bind_columns(names, F::bind)?;
        let rows: Vec<usize> = (0..self.rows_count())
            .filter(|&row| predicate.call(&bound, row))
            .collect();

        debug!("filteri kept {} of {} row(s)", rows.len(), self.rows_count());
        Ok(self.select_rows(rows))
    }

    pub fn map_to_column<Args, R, F>(
        &self,
        names: &[&str],
        new_name: &str,
        function: F,
    ) -> Result<Table>
    where
        F: RowFunction<Args, R>,
        R: ColumnResult,
    {
        //! Evaluate `function` for every row and store the results as a
        //! column called `new_name`.
        //!
        //! An existing column of that name is replaced where it stands,
        //! otherwise the new column goes at the end.

        let results: Vec<R> = self.map(names, function)?.collect();
        self.results_to_column(new_name, results)
    }

    pub fn mapi_to_column<Args, R, F>(
        &self,
        names: &[&str],
        new_name: &str,
        function: F,
    ) -> Result<Table>
    where
        F: IndexedRowFunction<Args, R>,
        R: ColumnResult,
    {
        let results: Vec<R> = self.mapi(names, function)?.collect();
        self.results_to_column(new_name, results)
    }

    fn results_to_column<R: ColumnResult>(&self, name: &str, results: Vec<R>) -> Result<Table> {
        let count = results.len();
        let values = R::collect_column(results)?;

        self.replace_or_add(Column::of_column_values(name, values, count))
    }

    pub fn transform<Args, R, F>(&self, names: &[&str], function: F) -> Result<R>
    where
        F: ArrayFunction<Args, R>,
    {
        //! Hand the whole arrays of the named columns to `function`, once,
        //! and return whatever it returns.

        let columns = self.resolve(names)?;
        function.invoke(columns.as_slice())
    }

    pub fn append_transform<Args, F>(&self, names: &[&str], function: F) -> Result<Table>
    where
        F: ArrayFunction<Args, Table>,
    {
        //! [`Table::transform`] producing a table that is then appended to
        //! this one. The produced table must have the same row count.

        let produced = self.transform(names, function)?;
        debug!(
            "appending {} transformed column(s) to {} column(s)",
            produced.count(),
            self.count()
        );

        self.append(&produced)
    }
}
