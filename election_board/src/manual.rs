/*!

This is the long-form manual for `election_board` and `electboard`.

## Data formats

All data files are produced out-of-band. `electboard` only ever reads them.

### Notice ledger (`notices.txt`)

One notice per line, fields separated by `|`:

```text
2024-01-15|Exam Schedule|Final exams begin next week|schedule.pdf
2024-01-10|Campus closed|The campus is closed for the holiday
```

The fourth field (an attachment file name) is optional. Blank lines are
ignored. Lines with fewer than three fields are skipped. The content may not
contain a `|`: a line with more than four fields is skipped as well, since it
cannot be told apart from content followed by an attachment. Skipped lines
are reported as warnings, with their line numbers.

Dates may be written `2024-01-15`, `2024-01-15T09:30`, `2024-01-15 09:30:00`
or as RFC 3339 timestamps.

Notice identifiers are positional (`notice1`, `notice2`, ...) over the
non-blank lines. They change when lines are reordered.

### Notice document (`notices.json`)

Used when the ledger cannot be fetched. `electboard --convert-notices` writes
it from a ledger.

```json
{ "notices": [ { "id": "notice1", "title": "Exam Schedule", "content": "...",
                 "date": "2024-01-15", "pdf": "schedule.pdf" } ] }
```

### Per-category results

One file per central panel position or councillor school:

```json
{ "position": "President", "lastUpdated": "2024-03-02T10:30:00Z",
  "candidates": [ { "name": "Asha", "votes": 1200 }, { "name": "NOTA", "votes": 12 } ] }
```

Councillor files use `school` instead of `position`.

### Combined results

A single file for the whole election:

```json
{ "lastUpdated": "2024-03-02T10:30:00Z",
  "centralPanel": [ { "name": "Asha", "votes": 1200 } ],
  "councillor": [ { "school": "SOE", "candidates": [ { "name": "Ravi", "votes": 40 } ] } ] }
```

The two shapes are not interchangeable: a deployment picks one with the
`layout` option.

## Failures

Each source is fetched independently. A source that fails (unreachable,
non-success status, timeout, unreadable body) is logged and left out; the
others render as usual. Only when every source of a section fails does the
section show an error panel. When no failure got past the transport (no
server answering, or no data directory at all), the panel explains how to
serve the data folder over HTTP. A file missing from a data directory that
does exist gets the generic panel instead.

## Configuration

`electboard` reads a JSON configuration file:

```json
{
  "outputSettings": { "outputDirectory": "public/fragments" },
  "dataRoot": "http://localhost:8000/data/",
  "refreshIntervalSecs": 60,
  "requestTimeoutSecs": 10,
  "notices": { "textPath": "notices.txt", "jsonPath": "notices.json",
               "homeLimit": 3, "attachmentBase": "data/notices/" },
  "results": { "layout": "perCategory", "candidateOrder": "source",
               "centralPanelDir": "central-panel",
               "centralPanelFiles": ["president.json", "vice-president.json"],
               "councillorDir": "councillors",
               "councillorFiles": ["soe.json", "sis.json"] },
  "statistics": { "centralPanel": { "male": 50, "female": 50 } }
}
```

- `dataRoot` (string): an `http(s)` URL, or a directory. A relative directory
  is resolved against the configuration file. HTTP requests carry a `v=`
  query parameter with the current time to defeat caches.
- `candidateOrder`: `source` keeps the order of the file (alphabetical with
  NOTA, BLANK and INVALID last), `votesDescending` sorts by votes.
- `layout`: `perCategory` or `combined` (with `combinedFile`).
- `statistics`: the gender ratios shown as pie charts. The values are taken as
  configured; they are not derived from the candidate data.

Every section is optional except `dataRoot`.

## Output

Each refresh writes these fragments into the output directory:
`notices.html`, `home-notices.html`, `central-results.html`,
`councillor-results.html`, `last-updated.html` and `statistics.html`.

 */
